use implementors_core::{
    Dispatcher, Fragment, ImplementorDispatcher, ImplementorRegistry, ImplementorSink,
    RegistrationRoute, ShardEmitter, ShardPayload,
};

#[derive(Clone, Copy, Debug)]
enum Step {
    Emit(usize),
    Init,
}

fn shard(index: usize) -> ShardPayload {
    ShardPayload::single(Fragment::new(
        format!("pkg{index}"),
        [format!("impl{index}a"), format!("impl{index}b")],
    ))
}

fn permutations(items: &[usize]) -> Vec<Vec<usize>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut all = Vec::new();
    for (position, &head) in items.iter().enumerate() {
        let mut rest = items.to_vec();
        rest.remove(position);
        for mut tail in permutations(&rest) {
            tail.insert(0, head);
            all.push(tail);
        }
    }
    all
}

/// Every emitter order combined with every init position.
fn all_schedules(emitters: usize) -> Vec<Vec<Step>> {
    let indices = (0..emitters).collect::<Vec<_>>();
    let mut schedules = Vec::new();
    for order in permutations(&indices) {
        for init_at in 0..=emitters {
            let mut steps = order.iter().map(|&i| Step::Emit(i)).collect::<Vec<_>>();
            steps.insert(init_at, Step::Init);
            schedules.push(steps);
        }
    }
    schedules
}

#[test]
fn registry_is_complete_for_every_load_order() {
    const EMITTERS: usize = 4;
    let schedules = all_schedules(EMITTERS);
    assert_eq!(schedules.len(), 24 * 5);

    for steps in schedules {
        let mut dispatcher = ImplementorDispatcher::new();
        for step in &steps {
            match *step {
                Step::Emit(index) => {
                    dispatcher.register(shard(index));
                }
                Step::Init => {
                    dispatcher
                        .initialize(ImplementorRegistry::new(), None)
                        .expect("single init should succeed");
                }
            }
        }

        let registry = dispatcher.sink().expect("sink should be ready");
        assert_eq!(registry.len(), EMITTERS, "schedule {steps:?}");
        for index in 0..EMITTERS {
            let implementors = registry
                .get(&format!("pkg{index}"))
                .unwrap_or_else(|| panic!("pkg{index} missing for schedule {steps:?}"));
            assert_eq!(implementors[0].as_str(), format!("impl{index}a"));
            assert_eq!(implementors[1].as_str(), format!("impl{index}b"));
        }
    }
}

#[derive(Default)]
struct OrderSink {
    applied: Vec<String>,
}

impl ImplementorSink for OrderSink {
    fn accept(&mut self, fragment: Fragment) {
        self.applied.push(fragment.crate_name);
    }
}

#[test]
fn application_order_matches_arrival_order_for_every_schedule() {
    for steps in all_schedules(3) {
        let mut dispatcher = Dispatcher::<OrderSink>::new();
        let mut arrival = Vec::new();
        for step in &steps {
            match *step {
                Step::Emit(index) => {
                    arrival.push(format!("pkg{index}"));
                    dispatcher.register(shard(index));
                }
                Step::Init => {
                    dispatcher
                        .initialize(OrderSink::default(), None)
                        .expect("single init should succeed");
                }
            }
        }

        let sink = dispatcher.into_sink().expect("sink should be ready");
        assert_eq!(sink.applied, arrival, "schedule {steps:?}");
    }
}

#[test]
fn documented_scenario_buffers_then_delivers() {
    let mut dispatcher = ImplementorDispatcher::new();

    let first = ShardEmitter::new()
        .with_crate("pkgA", ["implA1"])
        .emit(&mut dispatcher);
    let second = ShardEmitter::new()
        .with_crate("pkgB", ["implB1"])
        .emit(&mut dispatcher);
    assert_eq!(first, RegistrationRoute::Buffered { position: 0 });
    assert_eq!(second, RegistrationRoute::Buffered { position: 1 });

    dispatcher
        .initialize(ImplementorRegistry::new(), None)
        .expect("init should succeed");
    let registry = dispatcher.sink().expect("sink should be ready");
    assert_eq!(registry.crate_names(), vec!["pkgA", "pkgB"]);
    assert_eq!(registry.get("pkgA").map(|list| list[0].as_str()), Some("implA1"));
    assert_eq!(registry.get("pkgB").map(|list| list[0].as_str()), Some("implB1"));

    let third = ShardEmitter::new()
        .with_crate("pkgC", ["implC1"])
        .emit(&mut dispatcher);
    assert_eq!(third, RegistrationRoute::Delivered { fragments: 1 });
    assert_eq!(dispatcher.pending_len(), 0);
    let registry = dispatcher.sink().expect("sink should be ready");
    assert_eq!(registry.get("pkgC").map(|list| list[0].as_str()), Some("implC1"));
}

#[test]
fn duplicate_crate_across_shards_keeps_last_arrival() {
    let mut dispatcher = ImplementorDispatcher::new();
    ShardEmitter::new()
        .with_crate("spin", ["Mutex"])
        .emit(&mut dispatcher);
    dispatcher
        .initialize(
            ImplementorRegistry::new(),
            Some(ShardPayload::single(Fragment::new("spin", ["Initial"]))),
        )
        .expect("init should succeed");
    ShardEmitter::new()
        .with_crate("spin", ["RwLock"])
        .emit(&mut dispatcher);

    let registry = dispatcher.sink().expect("sink should be ready");
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("spin").map(|list| list[0].as_str()), Some("RwLock"));
}
