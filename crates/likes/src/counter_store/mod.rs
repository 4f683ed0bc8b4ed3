mod in_memory;
mod store;

pub use in_memory::InMemoryCounterStore;
pub use store::CounterStore;
