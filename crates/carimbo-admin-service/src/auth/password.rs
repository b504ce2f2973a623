//! 密码处理

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::error::AdminError;

/// bcrypt 哈希，商家账号初始化时使用
pub fn hash_password(password: &str) -> Result<String, AdminError> {
    hash(password, DEFAULT_COST).map_err(|e| AdminError::Internal(format!("密码哈希失败: {}", e)))
}

/// 比较明文密码与存储的哈希值
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AdminError> {
    verify(password, hash).map_err(|e| AdminError::Internal(format!("密码验证失败: {}", e)))
}
