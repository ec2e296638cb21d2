//! Shop Server - 零售后端服务
//!
//! # 架构概述
//!
//! 本模块是服务的主入口，提供以下核心功能：
//!
//! - **购物篮** (`services/basket`): 单一 ACTIVE 订单累加
//! - **订单状态机** (`services/order_status`): 角色门控的前向状态流转
//! - **商品删除守卫** (`services/catalog`): 引用检查与级联删除
//! - **数据库** (`db`): 嵌入式 SQLite 存储
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! shop-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # 调用者身份 (上游解析)
//! ├── api/           # HTTP 路由和处理器
//! ├── services/      # 领域服务 (订单/购物篮引擎)
//! ├── db/            # 数据库层
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::CurrentUser;
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置环境 (dotenv, 日志)
pub fn setup_environment() {
    dotenv::dotenv().ok();
    let log_level = std::env::var("LOG_LEVEL").ok();
    init_logger_with_file(log_level.as_deref(), None);
}
