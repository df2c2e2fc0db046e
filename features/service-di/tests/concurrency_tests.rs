use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc, Arc, Barrier, Mutex,
    },
    thread,
    time::Duration,
};

use rstest::*;
use service_di::{Container, Lifecycle};

struct Counted {
    id: usize,
}

struct Other;
struct Late;

#[fixture]
fn counter() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}

fn register_counted(container: &Container, counter: &Arc<AtomicUsize>, lifecycle: Lifecycle) {
    let counter = counter.clone();
    container.register(
        move || {
            // Widen the window in which concurrent first resolutions overlap
            thread::sleep(Duration::from_millis(10));
            Counted {
                id: counter.fetch_add(1, Ordering::SeqCst) + 1,
            }
        },
        lifecycle,
    );
}

#[rstest]
fn concurrent_singleton_is_constructed_once(counter: Arc<AtomicUsize>) {
    const THREADS: usize = 32;
    let container = Container::new();
    register_counted(&container, &counter, Lifecycle::Singleton);

    let barrier = Barrier::new(THREADS);
    let resolved: Vec<Arc<Counted>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    container.resolve::<Counted>().unwrap()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(resolved.len(), THREADS);
    for service in &resolved {
        assert_eq!(service.id, 1);
        assert!(Arc::ptr_eq(&resolved[0], service));
    }
}

#[rstest]
fn concurrent_transient_constructs_per_resolve(counter: Arc<AtomicUsize>) {
    const THREADS: usize = 8;
    let container = Container::new();
    register_counted(&container, &counter, Lifecycle::Transient);

    let ids: Vec<usize> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| scope.spawn(|| container.must_resolve::<Counted>().id))
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    assert_eq!(counter.load(Ordering::SeqCst), THREADS);
    let mut ids = ids;
    ids.sort_unstable();
    assert_eq!(ids, (1..=THREADS).collect::<Vec<_>>());
}

#[rstest]
fn singleton_construction_does_not_block_other_types() {
    let container = Container::new();
    let (started_tx, started_rx) = mpsc::channel::<()>();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let started_tx = Mutex::new(started_tx);
    let release_rx = Mutex::new(release_rx);

    // Counted stays under construction until the main thread was able to
    // register and resolve other types
    container.register_singleton(move || {
        started_tx.lock().unwrap().send(()).unwrap();
        let released = release_rx
            .lock()
            .unwrap()
            .recv_timeout(Duration::from_secs(5))
            .is_ok();
        Counted {
            id: usize::from(released),
        }
    });
    container.register_singleton(|| Other);

    thread::scope(|scope| {
        let constructing = scope.spawn(|| container.must_resolve::<Counted>());
        started_rx.recv_timeout(Duration::from_secs(5)).unwrap();

        container.must_resolve::<Other>();
        container.register_transient(|| Late);
        container.must_resolve::<Late>();
        release_tx.send(()).unwrap();

        let counted = constructing.join().unwrap();
        assert_eq!(counted.id, 1, "construction of Counted was never released");
    });
}

#[rstest]
fn reentrant_singleton_resolution_never_returns() {
    let container = Container::new();
    let handle = container.downgrade();
    container.register(
        move || {
            let container = handle.upgrade().expect("container is alive");
            // Resolving itself while the entry lock is held
            let inner = container.resolve::<Counted>().unwrap();
            Counted { id: inner.id + 1 }
        },
        Lifecycle::Singleton,
    );

    let (tx, rx) = mpsc::channel();
    let resolver = container.clone();
    // The thread is left blocked if the lock deadlocks
    thread::spawn(move || {
        let resolved = resolver.resolve::<Counted>().map(|service| service.id);
        let _ = tx.send(resolved);
    });

    match rx.recv_timeout(Duration::from_millis(300)) {
        Ok(resolved) => panic!("reentrant resolution returned {resolved:?}"),
        Err(mpsc::RecvTimeoutError::Timeout) | Err(mpsc::RecvTimeoutError::Disconnected) => {}
    }
}
