use vqsim_tester::properties;

#[test]
fn all_testable_properties_hold() {
    for property in properties::all() {
        let result = (property.run)();
        assert!(result.is_ok(), "property {:?} failed: {:?}", property.name, result.err());
    }
}
