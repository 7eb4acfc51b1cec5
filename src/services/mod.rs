mod store;

pub use store::StoreService;
