//! 全局配置管理,存储所有可配置项

/// 模式缓存默认容量
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// 全局配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeConfig {
    // 默认转义符（None 表示不启用转义）
    pub default_escape: Option<char>,
    // 模式缓存容量（条目数）
    pub cache_capacity: usize,
    // 是否启用详细日志
    pub verbose: bool,
}

impl Default for LikeConfig {
    fn default() -> Self {
        Self {
            default_escape: Some('\\'),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            verbose: false,
        }
    }
}

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 获取默认配置
    pub fn get_default() -> LikeConfig {
        LikeConfig::default()
    }

    /// 自定义配置
    pub fn custom() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }
}

/// 配置构建器（便于自定义配置）
#[derive(Debug, Clone, Default)]
pub struct CustomConfigBuilder {
    config: LikeConfig,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: LikeConfig::default(),
        }
    }

    pub fn default_escape(mut self, escape: Option<char>) -> Self {
        self.config.default_escape = escape;
        self
    }

    /// 容量至少为 1
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache_capacity = capacity.max(1);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    pub fn build(self) -> LikeConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConfigManager::get_default();
        assert_eq!(config.default_escape, Some('\\'));
        assert_eq!(config.cache_capacity, DEFAULT_CACHE_CAPACITY);
        assert!(!config.verbose);
    }

    #[test]
    fn test_custom_builder() {
        // 测试场景：容量 0 被修正为 1
        let config = ConfigManager::custom()
            .default_escape(None)
            .cache_capacity(0)
            .verbose(true)
            .build();
        assert_eq!(config.default_escape, None);
        assert_eq!(config.cache_capacity, 1);
        assert!(config.verbose);
    }
}
