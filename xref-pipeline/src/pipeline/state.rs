use state_machines::state_machine;

state_machine! {
    name: QueryMachine,
    state: QueryState,
    initial: Ready,
    states: [Ready, CacheChecked, CacheReady, Loaded, LookedUp, Sampled, Reported],
    events {
        check_cache { transition: { from: Ready, to: CacheChecked } }
        refresh { transition: { from: CacheChecked, to: CacheReady } }
        reuse_cache { transition: { from: CacheChecked, to: CacheReady } }
        load { transition: { from: CacheReady, to: Loaded } }
        lookup { transition: { from: Loaded, to: LookedUp } }
        sample { transition: { from: LookedUp, to: Sampled } }
        report { transition: { from: Sampled, to: Reported } }
    }
}

pub fn ready() -> QueryMachine<(), Ready> {
    QueryMachine::new(())
}
