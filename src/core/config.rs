use std::path::PathBuf;

use crate::auth::JwtConfig;

/// 邮件服务配置
///
/// `api_key` 未设置时邮件适配器运行在开发模式 (只记录日志不发送)
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// 邮件提供商 API Key
    pub api_key: Option<String>,
    /// 邮件提供商发送接口地址
    pub api_url: String,
    /// 发件人地址
    pub from_email: String,
    /// 发件人名称
    pub from_name: String,
}

/// WhatsApp Business API 配置
///
/// `access_token` 未设置时适配器运行在开发模式
#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    /// 访问令牌
    pub access_token: Option<String>,
    /// 发送号码 ID
    pub phone_number_id: String,
    /// Graph API 版本
    pub api_version: String,
}

/// 服务器配置 - 所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (database/, logs/) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | EMAIL_API_KEY | - | 邮件提供商 API Key |
/// | EMAIL_API_URL | https://api.sendgrid.com/v3/mail/send | 发送接口 |
/// | FROM_EMAIL | noreply@campaign.local | 发件人地址 |
/// | FROM_NAME | Campaign Central | 发件人名称 |
/// | WHATSAPP_ACCESS_TOKEN | - | WhatsApp 访问令牌 |
/// | WHATSAPP_PHONE_NUMBER_ID | - | 发送号码 ID |
/// | WHATSAPP_API_VERSION | v17.0 | Graph API 版本 |
/// | DEFAULT_COUNTRY_CODE | 91 | 10 位手机号默认国家码 |
/// | DEFAULT_MSME_STATUS | Others | 导入时默认 MSME 状态 |
/// | MAX_UPLOAD_SIZE | 10485760 | 上传文件大小上限 (字节) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/campaign HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 邮件服务配置
    pub email: EmailConfig,
    /// WhatsApp 服务配置
    pub whatsapp: WhatsAppConfig,
    /// 10 位手机号默认国家码
    pub default_country_code: String,
    /// 导入时默认 MSME 状态
    pub default_msme_status: String,
    /// 上传文件大小上限 (字节)
    pub max_upload_size: usize,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            email: EmailConfig {
                api_key: std::env::var("EMAIL_API_KEY").ok().filter(|k| !k.is_empty()),
                api_url: std::env::var("EMAIL_API_URL")
                    .unwrap_or_else(|_| "https://api.sendgrid.com/v3/mail/send".into()),
                from_email: std::env::var("FROM_EMAIL")
                    .unwrap_or_else(|_| "noreply@campaign.local".into()),
                from_name: std::env::var("FROM_NAME")
                    .unwrap_or_else(|_| "Campaign Central".into()),
            },
            whatsapp: WhatsAppConfig {
                access_token: std::env::var("WHATSAPP_ACCESS_TOKEN")
                    .ok()
                    .filter(|k| !k.is_empty()),
                phone_number_id: std::env::var("WHATSAPP_PHONE_NUMBER_ID").unwrap_or_default(),
                api_version: std::env::var("WHATSAPP_API_VERSION")
                    .unwrap_or_else(|_| "v17.0".into()),
            },
            default_country_code: std::env::var("DEFAULT_COUNTRY_CODE")
                .unwrap_or_else(|_| "91".into()),
            default_msme_status: std::env::var("DEFAULT_MSME_STATUS")
                .unwrap_or_else(|_| "Others".into()),
            max_upload_size: std::env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10 * 1024 * 1024),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 数据库目录 (work_dir/database)
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 日志目录 (work_dir/logs)
    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
