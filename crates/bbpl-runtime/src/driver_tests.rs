// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use bbpl_core::id::SequentialIdGen;

#[test]
fn connect_does_not_panic_without_a_daemon() {
    let id_gen: Arc<dyn IdGen> = Arc::new(SequentialIdGen::new("test"));
    // `connect_with_local_defaults` only builds the HTTP transport; it
    // never panics even when no daemon is reachable at the socket path.
    let _ = RuntimeDriver::connect(id_gen);
}

#[tokio::test]
async fn cleanup_on_a_freshly_connected_driver_is_a_no_op() {
    let id_gen: Arc<dyn IdGen> = Arc::new(SequentialIdGen::new("test"));
    let Ok(driver) = RuntimeDriver::connect(id_gen) else {
        return;
    };
    driver.cleanup(None).await;
}
