//! Campaign Central - 供应商合规活动管理后端
//!
//! # 架构概述
//!
//! 本模块是后端服务的主入口，提供以下核心功能：
//!
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储 (供应商/活动/模板/响应/表单)
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **活动引擎** (`campaigns`): 模板渲染 + 逐供应商派发循环
//! - **批量导入** (`import`): 电子表格解析与邮箱/手机号校验启发式
//! - **动态表单** (`forms`): 条件可见性求值与提交校验
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、角色
//! ├── db/            # 数据库层 (models + repositories)
//! ├── campaigns/     # 活动执行引擎
//! ├── import/        # 供应商批量导入/导出
//! ├── forms/         # 动态表单引擎
//! ├── services/      # 邮件 / WhatsApp 适配器
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod auth;
pub mod campaigns;
pub mod core;
pub mod db;
pub mod forms;
pub mod import;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use campaigns::{CampaignExecutor, ExecutionReport};
pub use self::core::{Config, Server, ServerState};
pub use import::VendorImporter;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置环境 (dotenv + 日志)
pub fn setup_environment() {
    dotenv::dotenv().ok();
    let log_level = std::env::var("LOG_LEVEL").ok();
    init_logger_with_file(log_level.as_deref(), None);
}

pub fn print_banner() {
    println!(
        r#"
   ______
  / ____/___ _____ ___  ____  ____ _(_)___ _____
 / /   / __ `/ __ `__ \/ __ \/ __ `/ / __ `/ __ \
/ /___/ /_/ / / / / / / /_/ / /_/ / / /_/ / / / /
\____/\__,_/_/ /_/ /_/ .___/\__,_/_/\__, /_/ /_/
                    /_/            /____/
   ______           __             __
  / ____/__  ____  / /__________ _/ /
 / /   / _ \/ __ \/ __/ ___/ __ `/ /
/ /___/  __/ / / / /_/ /  / /_/ / /
\____/\___/_/ /_/\__/_/   \__,_/_/
    "#
    );
}
