#[test]
fn formwork_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/error_pass.rs");
    t.compile_fail("tests/ui/error_no_context.rs");
    t.compile_fail("tests/ui/error_bad_context_type.rs");
    t.compile_fail("tests/ui/error_tuple_variant.rs");
}
