//! Check the C header generated by the build script.

const HEADER: &str = concat!(env!("OUT_DIR"), "/card_shuffler.h");

#[test]
fn header_is_generated_in_out_dir() {
    let header = std::fs::read_to_string(HEADER).unwrap();
    assert!(header.contains("#ifndef CARD_SHUFFLER_H"));
    for name in [
        "shuffler_client_new",
        "shuffler_client_new_with_host",
        "shuffler_build_request",
        "shuffler_parse_response",
        "shuffler_execute",
        "shuffler_free_result",
    ] {
        assert!(header.contains(name), "missing {name}");
    }
}

