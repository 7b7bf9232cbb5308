//! 运行：RUST_LOG=debug cargo run -p ddd-eventing --example command_stack
use ddd_eventing::error::{DomainError, DomainResult};
use ddd_eventing::{Event, EventContext, EventHandler, EventPipeline, HandledEventType};
use std::collections::HashMap;
use std::error::Error as _;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

/// 账户存储：处理器之间共享的副作用
#[derive(Default)]
struct Directory {
    users: Mutex<HashMap<String, String>>,
    mailboxes: Mutex<Vec<String>>,
}

struct CreateUser {
    dir: Arc<Directory>,
}

impl EventHandler for CreateUser {
    fn handler_name(&self) -> &str {
        "create-user"
    }
    fn handle(&self, _context: &EventContext, event: &Event) -> DomainResult<()> {
        let user: String = event.require_property("user")?;
        let email: String = event.require_property("email")?;
        self.dir.users.lock().unwrap().insert(user, email);
        Ok(())
    }
    fn rollback(&self, _context: &EventContext, event: &Event) -> DomainResult<()> {
        if let Some(user) = event.property_as::<String>("user")? {
            self.dir.users.lock().unwrap().remove(&user);
        }
        Ok(())
    }
    fn handled_event_type(&self) -> HandledEventType {
        HandledEventType::One("user.registered".into())
    }
    fn priority(&self) -> i32 {
        10
    }
}

struct ProvisionMailbox {
    dir: Arc<Directory>,
}

impl EventHandler for ProvisionMailbox {
    fn handler_name(&self) -> &str {
        "provision-mailbox"
    }
    fn handle(&self, _context: &EventContext, event: &Event) -> DomainResult<()> {
        let user: String = event.require_property("user")?;
        self.dir.mailboxes.lock().unwrap().push(user);
        Ok(())
    }
    fn rollback(&self, _context: &EventContext, _event: &Event) -> DomainResult<()> {
        Err(DomainError::Rollback {
            handler: self.handler_name().into(),
            reason: "mail server unreachable".into(),
        })
    }
}

struct SendWelcome;

impl EventHandler for SendWelcome {
    fn handler_name(&self) -> &str {
        "send-welcome"
    }
    fn handle(&self, _context: &EventContext, event: &Event) -> DomainResult<()> {
        let email: String = event.require_property("email")?;
        if !email.contains('@') {
            return Err(DomainError::InvalidEvent {
                reason: format!("malformed email: {email}"),
            });
        }
        Ok(())
    }
    fn rollback(&self, _context: &EventContext, _event: &Event) -> DomainResult<()> {
        Ok(())
    }
    fn priority(&self) -> i32 {
        -10
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let dir = Arc::new(Directory::default());
    let pipeline = EventPipeline::new(vec![
        Arc::new(SendWelcome),
        Arc::new(ProvisionMailbox { dir: dir.clone() }),
        Arc::new(CreateUser { dir: dir.clone() }),
    ]);
    let ctx = EventContext::builder()
        .maybe_correlation_id(Some("cor-demo".into()))
        .maybe_actor_type(Some("admin".into()))
        .build();

    let ok = Event::new("user.registered")
        .with_property("user", "alice")
        .with_property("email", "alice@example.com");
    match pipeline.handle_event(&ctx, &ok) {
        Ok(n) => println!("alice registered by {n} handlers"),
        Err(e) => println!("unexpected failure: {e}"),
    }

    let bad = Event::new("user.registered")
        .with_property("user", "bob")
        .with_property("email", "bob.example.com");
    if let Err(err) = pipeline.handle_event(&ctx, &bad) {
        println!("bob failed:\n{err}");
        println!("primary cause: {}", err.primary_cause());
        for failure in err.rollback_failures() {
            let cause = failure.source().map(|s| s.to_string()).unwrap_or_default();
            println!("  {failure}: {cause}");
        }
    }

    println!("users: {:?}", dir.users.lock().unwrap().keys().collect::<Vec<_>>());
    println!("mailboxes: {:?}", dir.mailboxes.lock().unwrap());
}
