mod roots;

pub use roots::StubRootDb;
