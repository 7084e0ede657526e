//! Command handlers for the Zabbix export tools

pub mod export;
pub mod token;
