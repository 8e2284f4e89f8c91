//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证相关接口
//! - [`vendors`] - 供应商管理接口
//! - [`campaigns`] - 活动管理和执行接口
//! - [`templates`] - 邮件/WhatsApp 模板接口
//! - [`responses`] - 活动响应接口
//! - [`forms`] - 动态表单接口 (含公开路由)
//! - [`uploads`] - 批量导入/导出接口
//! - [`analytics`] - 统计分析接口

pub mod analytics;
pub mod auth;
pub mod campaigns;
pub mod forms;
pub mod health;
pub mod responses;
pub mod templates;
pub mod uploads;
pub mod vendors;
