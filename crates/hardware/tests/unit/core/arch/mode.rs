//! Privilege mode encoding tests.

use rvpipe_core::core::arch::mode::PrivilegeMode;

#[test]
fn encoding_round_trips_and_reserved_maps_to_user() {
    for m in [PrivilegeMode::User, PrivilegeMode::Supervisor, PrivilegeMode::Machine] {
        assert_eq!(PrivilegeMode::from_bits(m.bits()), m);
    }
    assert_eq!(PrivilegeMode::from_bits(2), PrivilegeMode::User);
}

#[test]
fn ordering_and_display() {
    assert!(PrivilegeMode::User < PrivilegeMode::Supervisor);
    assert!(PrivilegeMode::Supervisor < PrivilegeMode::Machine);
    assert_eq!(PrivilegeMode::default(), PrivilegeMode::Machine);
    assert_eq!(PrivilegeMode::Supervisor.to_string(), "Supervisor");
    assert_eq!(PrivilegeMode::Machine.letter(), 'M');
}
