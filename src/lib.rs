//! Clinic Teaching - 临床教学应用的持久层与角色对话适配器
//!
//! 基于 SeaORM 的五表存储（用户、模型、提示词、分类、病例），
//! 以及对接通义星尘角色对话平台的客户端。
//!
//! # 架构
//! - `chat`: 角色对话平台接入
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `models`: 数据模型定义
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务流程（注册、登录、病例保存、导出）
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod chat;
pub mod config;
pub mod entity;
pub mod errors;
pub mod models;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
