pub mod cli;
pub mod scenario;

// 导出 raii_vec 供二进制与集成测试使用
pub use raii_vec;
