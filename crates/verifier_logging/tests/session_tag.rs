use std::thread;

use verifier_logging::{current_session, set_session, verifier_debug, verifier_info};

#[test]
fn session_defaults_to_zero() {
    let session = thread::spawn(current_session).join().unwrap();
    assert_eq!(session, 0);
}

#[test]
fn session_is_thread_local() {
    set_session(7);
    assert_eq!(current_session(), 7);

    let other = thread::spawn(|| {
        set_session(3);
        current_session()
    })
    .join()
    .unwrap();

    assert_eq!(other, 3);
    assert_eq!(current_session(), 7);
}

#[test]
fn macros_accept_format_arguments() {
    verifier_logging::initialize_for_tests();
    verifier_logging::initialize_for_tests();
    set_session(1);
    verifier_info!("phase {} applied", "check_domain");
    verifier_debug!("ordinal={ordinal}", ordinal = 1);
}
