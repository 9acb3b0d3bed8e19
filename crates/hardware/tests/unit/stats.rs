//! Statistics tests.

use pretty_assertions::assert_eq;
use rvpipe_core::core::pipeline::signals::FetchReason;
use rvpipe_core::stats::SimStats;

#[test]
fn ipc_handles_zero_cycles() {
    let mut s = SimStats::default();
    assert_eq!(s.ipc(), 0.0);
    s.cycles = 8;
    s.instructions_retired = 6;
    assert_eq!(s.ipc(), 0.75);
}

#[test]
fn redirects_are_counted_per_reason() {
    let mut s = SimStats::default();
    s.record_redirect(FetchReason::Exception);
    s.record_redirect(FetchReason::Exception);
    s.record_redirect(FetchReason::FenceI);
    assert_eq!(s.redirects_for(FetchReason::Exception), 2);
    assert_eq!(s.redirects_for(FetchReason::FenceI), 1);
    assert_eq!(s.redirects_for(FetchReason::Mispredict), 0);
}

#[test]
fn printing_does_not_panic() {
    let s = SimStats::default();
    s.print();
    s.print_sections(&["control".to_string()]);
}
