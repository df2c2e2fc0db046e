use std::sync::Arc;

use service_di::{Container, ContainerBuilder, Lifecycle, ResolveError};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), ResolveError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let container = ContainerBuilder::new()
        .add_instance("test".to_string())
        .add_singleton(|| Counter { start: 10 })
        .build();

    let weak = container.downgrade();
    container.register(
        move || {
            let container = weak.upgrade().expect("container dropped while resolving");
            Test {
                a: container.must_resolve::<String>(),
                counter: container.must_resolve::<Counter>(),
            }
        },
        Lifecycle::Transient,
    );

    println!("{:?}", container);
    let first = container.resolve::<Test>()?;
    let second = container.resolve::<Test>()?;
    println!("{:?} (counter starts at {})", first.a, first.counter.start);
    println!(
        "same test: {}, same counter: {}",
        Arc::ptr_eq(&first, &second),
        Arc::ptr_eq(&first.counter, &second.counter)
    );
    println!("{:?}", container);

    if let Err(err) = Container::new().resolve::<Test>() {
        println!("empty container: {err}");
    }

    Ok(())
}

#[derive(Debug)]
struct Test {
    a: Arc<String>,
    counter: Arc<Counter>,
}

#[derive(Debug)]
struct Counter {
    start: u32,
}
