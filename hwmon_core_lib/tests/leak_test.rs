//! Create/destroy balance accounting.
//!
//! Lives in its own test binary so the process-wide handle table is not
//! shared with unrelated tests running in parallel.

mod common;

use hwmon_core_lib::{HwmonStatus, hwmon_destroy, hwmon_live_count};

use common::static_handle;

#[test]
fn test_destroy_balances_create() {
    let baseline = hwmon_live_count();

    let handles: Vec<_> = (0..16).map(|i| static_handle(&format!("m{}", i))).collect();
    assert_eq!(hwmon_live_count(), baseline + 16);

    for handle in handles {
        assert_eq!(hwmon_destroy(handle), HwmonStatus::Success);
    }
    assert_eq!(hwmon_live_count(), baseline);

    // Reuse after churn still balances: slots recycle, count does not drift
    for round in 0..8 {
        let handle = static_handle(&format!("round{}", round));
        assert_eq!(hwmon_live_count(), baseline + 1);
        assert_eq!(hwmon_destroy(handle), HwmonStatus::Success);
    }
    assert_eq!(hwmon_live_count(), baseline);
}
