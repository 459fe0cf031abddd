use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use crate::process::host::HostLoop;

#[test]
fn pump_runs_timers_and_tasks() {
    let mut runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime");

    let fired = Arc::new(AtomicBool::new(false));
    let flag = fired.clone();
    runtime.spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        flag.store(true, Ordering::SeqCst);
    });

    for _ in 0..200 {
        if fired.load(Ordering::SeqCst) {
            break;
        }
        runtime.pump();
    }
    assert!(fired.load(Ordering::SeqCst), "Pumping should drive spawned tasks");
}
