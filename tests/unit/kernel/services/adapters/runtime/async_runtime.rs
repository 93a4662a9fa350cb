use super::*;

#[test]
fn block_on_drives_spawned_tasks() {
    let runtime = AsyncRuntime::new().unwrap();
    let handle = runtime.tokio_handle();
    let value = runtime.block_on(async move {
        let task = handle.spawn(async { 21 * 2 });
        task.await.unwrap()
    });
    assert_eq!(value, 42);
}
