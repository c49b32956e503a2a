#[test]
fn obs_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/obs_error_pass.rs");
}
