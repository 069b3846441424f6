use vqsim_tester::scenarios;

#[test]
fn all_six_scenarios_pass() {
    for scenario in scenarios::all() {
        let grid = (scenario.build)();
        let result = (scenario.check)(&grid);
        assert!(result.is_ok(), "scenario {:?} failed: {:?}", scenario.name, result.err());
    }
}
