//! 编译计划缓存
//! 同一模式 + 转义符只编译一次，计划以 Arc 共享给所有调用方

use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use crate::compiler::{CompiledPattern, PatternCompiler};
use crate::config::{LikeConfig, DEFAULT_CACHE_CAPACITY};
use crate::error::LikeResult;

/// 缓存Key：(模式原文, 转义符)
type CacheKey = (Box<[u8]>, Option<u8>);

/// 全局模式缓存（默认配置）
static GLOBAL_PATTERN_CACHE: Lazy<PatternCache> = Lazy::new(PatternCache::new);

/// 获取全局模式缓存
pub fn global_pattern_cache() -> &'static PatternCache {
    &GLOBAL_PATTERN_CACHE
}

/// 线程安全的模式缓存
/// 读锁查缓存 → 未命中则锁外编译，再写锁插入
#[derive(Debug)]
pub struct PatternCache {
    entries: RwLock<FxHashMap<CacheKey, Arc<CompiledPattern>>>,
    capacity: usize,
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_config(config: &LikeConfig) -> Self {
        Self::with_capacity(config.cache_capacity)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(FxHashMap::default()),
            capacity: capacity.max(1),
        }
    }

    /// 获取编译计划（命中缓存直接返回，编译失败不缓存）
    pub fn get_or_compile(&self, pattern: &[u8], escape: Option<u8>) -> LikeResult<Arc<CompiledPattern>> {
        let key: CacheKey = (pattern.into(), escape);

        // 1. 读锁查询缓存
        {
            let cache_read = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(plan) = cache_read.get(&key) {
                return Ok(plan.clone());
            }
        }

        // 2. 锁外编译，错误直接上抛
        let compiled = Arc::new(PatternCompiler::compile(pattern, escape)?);

        // 3. 写锁插入（满则淘汰一半）
        let mut cache_write = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if cache_write.len() >= self.capacity && !cache_write.contains_key(&key) {
            let evict_count = (self.capacity / 2).max(1);
            let victims: Vec<CacheKey> = cache_write.keys().take(evict_count).cloned().collect();
            for victim in &victims {
                cache_write.remove(victim);
            }
            like_debug!(
                "Pattern cache full, evicted {} entries (capacity: {})",
                victims.len(),
                self.capacity
            );
        }
        Ok(cache_write.entry(key).or_insert(compiled).clone())
    }

    /// 字符串版本，转义符必须是 ASCII 字符
    pub fn get_or_compile_str(&self, pattern: &str, escape: Option<char>) -> LikeResult<Arc<CompiledPattern>> {
        let escape = escape.map(PatternCompiler::escape_byte).transpose()?;
        self.get_or_compile(pattern.as_bytes(), escape)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}
