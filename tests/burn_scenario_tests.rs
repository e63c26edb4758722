use busnet::fault::BurnKind;
use busnet::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Net X driven by O1 and O2, both 4 bits wide.
fn net_x() -> (Model, SignalId, SignalId, NetId) {
    init_tracing();
    let mut model = Model::new();
    let o1 = model.add_output("O1", 4).unwrap();
    let o2 = model.add_output("O2", 4).unwrap();
    let x = DataBus::builder(&[o1, o2]).label("X").build(&mut model).unwrap();
    (model, o1, o2, x.net())
}

#[test]
fn test_one_defined_driver_no_burn() {
    let (mut model, o1, _o2, x) = net_x();

    model.set_output(o1, 5);
    assert_eq!(model.net_value(x).as_defined(), Some(5));
    assert_eq!(model.pending_checks(), 0);
    assert!(model.step().is_ok());
}

#[test]
fn test_conflict_surviving_step_fails() {
    let (mut model, o1, o2, x) = net_x();
    model.set_output(o1, 5);
    model.step().unwrap();

    model.set_output(o2, 7);
    // burn is never immediately fatal
    assert_eq!(model.net_value(x).as_defined(), Some(5));
    assert_eq!(model.pending_checks(), 1);

    let err = model.step().unwrap_err();
    assert_eq!(
        err,
        BurnError::ShortCircuit {
            nets: vec!["X".into()],
            drivers: vec!["O1".into(), "O2".into()],
            origins: vec![],
        }
    );
    assert_eq!(model.stats().fatal_burns, 1);
    // still burning, so it is checked again at the end of the next step
    assert_eq!(model.pending_checks(), 1);
}

/// Nets X and Y, each driven by two 1-bit outputs.
fn nets_x_y() -> (Model, [SignalId; 4], [NetId; 2]) {
    init_tracing();
    let mut model = Model::new();
    let x1 = model.add_output("x1", 1).unwrap();
    let x2 = model.add_output("x2", 1).unwrap();
    let y1 = model.add_output("y1", 1).unwrap();
    let y2 = model.add_output("y2", 1).unwrap();
    let x = DataBus::builder(&[x1, x2]).label("X").build(&mut model).unwrap();
    let y = DataBus::builder(&[y1, y2]).label("Y").build(&mut model).unwrap();
    (model, [x1, x2, y1, y2], [x.net(), y.net()])
}

#[test]
fn test_every_pending_net_checked_in_one_step() {
    let (mut model, [x1, x2, y1, y2], _) = nets_x_y();
    model.set_output(x1, 0);
    model.set_output(x2, 1);
    model.set_output(y1, 0);
    model.set_output(y2, 1);
    assert_eq!(model.pending_checks(), 2);

    let err = model.step().unwrap_err();
    assert_eq!(err.nets(), ["X"]);
    assert_eq!(model.stats().checks_performed, 2);
    assert_eq!(model.stats().fatal_burns, 2);
    assert_eq!(model.pending_checks(), 2);
}

#[test]
fn test_short_surviving_failed_step_is_reported_again() {
    let (mut model, [x1, x2, y1, y2], [x, _y]) = nets_x_y();
    model.set_output(x1, 0);
    model.set_output(x2, 1);
    model.set_output(y1, 0);
    model.set_output(y2, 1);
    assert_eq!(model.step().unwrap_err().nets(), ["X"]);

    // X is fixed, Y keeps burning
    model.set_high_z(x2);
    assert_eq!(model.net_value(x).as_defined(), Some(0));
    assert_eq!(model.step().unwrap_err().nets(), ["Y"]);
    assert_eq!(model.pending_checks(), 1);

    model.set_high_z(y2);
    assert!(model.step().is_ok());
    assert_eq!(model.pending_checks(), 0);
    assert!(model.step().is_ok());

    let steps: Vec<u64> = model.history().records().iter().map(|r| r.step).collect();
    assert_eq!(steps, vec![1, 2]);
}

#[test]
fn test_unresolved_short_fails_every_step() {
    let (mut model, o1, o2, _x) = net_x();
    model.set_output(o1, 1);
    model.set_output(o2, 2);

    for _ in 0..3 {
        assert!(model.step().is_err());
        assert_eq!(model.pending_checks(), 1);
    }
    assert_eq!(model.history().len(), 3);

    // changing a driver inside the step does not queue the net twice
    model.set_output(o2, 3);
    assert_eq!(model.pending_checks(), 1);

    model.set_output(o2, 1);
    assert!(model.step().is_ok());
    assert_eq!(model.stats().transient_burns, 1);
}

#[test]
fn test_conflict_healed_before_step_end() {
    let (mut model, o1, o2, x) = net_x();
    model.set_output(o1, 5);
    model.set_output(o2, 7);
    model.set_high_z(o2);

    assert_eq!(model.net_value(x).as_defined(), Some(5));
    assert!(model.step().is_ok());
    assert_eq!(model.stats().transient_burns, 1);
    assert_eq!(model.stats().fatal_burns, 0);
    assert!(model.history().is_empty());
}

#[test]
fn test_burning_handler_queued_once_per_step() {
    let (mut model, o1, o2, _x) = net_x();
    model.set_output(o1, 1);
    model.set_output(o2, 2);
    model.set_output(o2, 3);
    model.set_output(o1, 4);
    model.set_output(o2, 5);

    assert_eq!(model.pending_checks(), 1);
}

#[test]
fn test_burn_requeued_in_next_step() {
    let (mut model, o1, o2, _x) = net_x();
    model.set_output(o1, 1);
    model.set_output(o2, 2);
    model.set_high_z(o2);
    let version = model.version();
    assert!(model.step().is_ok());
    assert_eq!(model.version(), version + 1);

    model.set_output(o2, 2);
    assert_eq!(model.pending_checks(), 1);
    assert!(model.step().is_err());
}

#[test]
fn test_check_burn_event_catches_conflict_at_build() {
    init_tracing();
    let mut model = Model::new();
    let a = model.add_output("a", 1).unwrap();
    let b = model.add_output("b", 1).unwrap();
    model.set_output(a, 0);
    model.set_output(b, 1);

    let bus = model.build_bus(&[a, b]).unwrap();
    assert_eq!(model.net_value(bus.net()).as_defined(), Some(0));

    let err = model.check_burn().unwrap_err();
    assert_eq!(err.drivers(), ["a", "b"]);
    assert_eq!(model.step_count(), 0);
}

#[test]
fn test_short_across_closed_switch() {
    init_tracing();
    let mut model = Model::new();
    let a = model.add_output("a", 8).unwrap();
    let b = model.add_output("b", 8).unwrap();
    let left = DataBus::builder(&[a]).label("L").origin("cpu.dig").build(&mut model).unwrap();
    let right = DataBus::builder(&[b]).label("R").origin("io.dig").build(&mut model).unwrap();
    model.set_output(a, 1);
    model.set_output(b, 2);
    assert!(model.step().is_ok());

    model.add_switch(left.net(), right.net(), true).unwrap();
    assert_eq!(model.pending_checks(), 1);

    let err = model.step().unwrap_err();
    assert_eq!(err.nets(), ["L", "R"]);
    assert_eq!(err.drivers(), ["a", "b"]);
    assert!(err.to_string().contains("cpu.dig, io.dig"));
}

#[test]
fn test_opening_switch_before_step_end_heals_short() {
    let mut model = Model::new();
    let a = model.add_output("a", 8).unwrap();
    let b = model.add_output("b", 8).unwrap();
    let left = model.build_bus(&[a]).unwrap();
    let right = model.build_bus(&[b]).unwrap();
    model.set_output(a, 1);
    model.set_output(b, 2);

    let sw = model.add_switch(left.net(), right.net(), true).unwrap();
    assert_eq!(model.pending_checks(), 1);

    model.set_switch(sw, false);
    assert_eq!(model.pending_checks(), 0);
    assert!(model.step().is_ok());
    assert_eq!(model.net_value(left.net()).as_defined(), Some(1));
    assert_eq!(model.net_value(right.net()).as_defined(), Some(2));
}

#[test]
fn test_burn_on_single_net_then_merge_requeues_group() {
    let mut model = Model::new();
    let a1 = model.add_output("a1", 2).unwrap();
    let a2 = model.add_output("a2", 2).unwrap();
    let b = model.add_output("b", 2).unwrap();
    let left = model.build_bus(&[a1, a2]).unwrap();
    let right = model.build_bus(&[b]).unwrap();

    model.set_output(a1, 1);
    model.set_output(a2, 2);
    assert_eq!(model.pending_checks(), 1);

    // the superseded single handler is dropped, the group takes over
    model.add_switch(left.net(), right.net(), true).unwrap();
    assert_eq!(model.pending_checks(), 1);
    assert_eq!(model.step().unwrap_err().drivers(), ["a1", "a2"]);
}

#[test]
fn test_fatal_burns_recorded_in_history() {
    let (mut model, o1, o2, _x) = net_x();
    model.step().unwrap();
    model.set_output(o1, 3);
    model.set_output(o2, 4);
    assert!(model.step().is_err());

    let record = model.history().latest().unwrap();
    assert_eq!(record.step, 2);
    assert_eq!(record.kind, BurnKind::ShortCircuit);
    assert_eq!(record.nets, vec!["X".to_string()]);
    assert_eq!(record.drivers, vec!["O1".to_string(), "O2".to_string()]);
}

#[test]
fn test_history_can_be_disabled() {
    let config = BusConfig::from_json(r#"{"history_enabled": false}"#).unwrap();
    let mut model = Model::with_config(config);
    let a = model.add_output("a", 1).unwrap();
    let b = model.add_output("b", 1).unwrap();
    model.build_bus(&[a, b]).unwrap();
    model.set_output(a, 0);
    model.set_output(b, 1);

    assert!(model.step().is_err());
    assert!(model.history().is_empty());
}

#[test]
fn test_errors_convert_to_sim_error() {
    fn run() -> Result<(), SimError> {
        let mut model = Model::new();
        let a = model.add_output("a", 1)?;
        let b = model.add_output("b", 1)?;
        model.build_bus(&[a, b])?;
        model.set_output(a, 0);
        model.set_output(b, 1);
        model.step()?;
        Ok(())
    }

    assert!(matches!(run(), Err(SimError::Burn(BurnError::ShortCircuit { .. }))));
}
