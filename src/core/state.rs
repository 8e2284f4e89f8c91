//! 服务器状态
//!
//! ServerState 持有所有共享服务的单例引用，使用 Arc 实现浅拷贝。

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::{
    CampaignRepository, EmailTemplateRepository, FormRepository, FormResponseRepository,
    ResponseRepository, SendLogRepository, UploadLogRepository, UserRepository, VendorRepository,
    WhatsAppTemplateRepository,
};
use crate::services::{EmailSender, EmailService, WhatsAppSender, WhatsAppService};

/// 服务器状态 - 持有所有服务的共享引用
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | email | Arc<dyn EmailSender> | 邮件适配器 |
/// | whatsapp | Arc<dyn WhatsAppSender> | WhatsApp 适配器 |
///
/// Repository 通过访问器方法按需构建 (`state.vendors()` 等)，
/// 内部共享同一个数据库连接。
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务
    pub jwt_service: Arc<JwtService>,
    /// 邮件发送适配器
    pub email: Arc<dyn EmailSender>,
    /// WhatsApp 发送适配器
    pub whatsapp: Arc<dyn WhatsAppSender>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/campaign.db)
    /// 3. JWT 服务和通知适配器
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("campaign.db");
        let db = DbService::connect(&db_path)
            .await
            .expect("Failed to initialize database");

        let email: Arc<dyn EmailSender> = Arc::new(EmailService::new(config.email.clone()));
        let whatsapp: Arc<dyn WhatsAppSender> =
            Arc::new(WhatsAppService::new(config.whatsapp.clone()));

        Self {
            config: config.clone(),
            db,
            jwt_service: Arc::new(JwtService::with_config(config.jwt.clone())),
            email,
            whatsapp,
        }
    }

    /// 使用自定义适配器构建状态 (测试替身注入)
    pub fn with_senders(
        config: Config,
        db: Surreal<Db>,
        email: Arc<dyn EmailSender>,
        whatsapp: Arc<dyn WhatsAppSender>,
    ) -> Self {
        Self {
            jwt_service: Arc::new(JwtService::with_config(config.jwt.clone())),
            config,
            db,
            email,
            whatsapp,
        }
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    // ========== Repository accessors ==========

    pub fn vendors(&self) -> VendorRepository {
        VendorRepository::new(self.db.clone())
    }

    pub fn campaigns(&self) -> CampaignRepository {
        CampaignRepository::new(self.db.clone())
    }

    pub fn email_templates(&self) -> EmailTemplateRepository {
        EmailTemplateRepository::new(self.db.clone())
    }

    pub fn whatsapp_templates(&self) -> WhatsAppTemplateRepository {
        WhatsAppTemplateRepository::new(self.db.clone())
    }

    pub fn responses(&self) -> ResponseRepository {
        ResponseRepository::new(self.db.clone())
    }

    pub fn send_logs(&self) -> SendLogRepository {
        SendLogRepository::new(self.db.clone())
    }

    pub fn forms(&self) -> FormRepository {
        FormRepository::new(self.db.clone())
    }

    pub fn form_responses(&self) -> FormResponseRepository {
        FormResponseRepository::new(self.db.clone())
    }

    pub fn upload_logs(&self) -> UploadLogRepository {
        UploadLogRepository::new(self.db.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.db.clone())
    }
}
