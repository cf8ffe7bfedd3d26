use async_trait::async_trait;
use dashmap::DashSet;
use kernel_domain::uniqueness::{UnavailableError, UniquenessChecker, UniquenessClaim};

/// 基于内存的唯一性索引
/// - `exists` 以原子插入实现“检查并预留”：同一声明的并发查询至多一个得到 `false`
/// - `release` 移除预留，`register` 直接登记已存在的值
#[derive(Debug, Default)]
pub struct InMemoryUniquenessIndex {
    reserved: DashSet<UniquenessClaim>,
}

impl InMemoryUniquenessIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记已存在的值；已登记过返回 `false`
    pub fn register(&self, claim: UniquenessClaim) -> bool {
        self.reserved.insert(claim)
    }

    pub fn contains(&self, claim: &UniquenessClaim) -> bool {
        self.reserved.contains(claim)
    }

    pub fn len(&self) -> usize {
        self.reserved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reserved.is_empty()
    }
}

#[async_trait]
impl UniquenessChecker for InMemoryUniquenessIndex {
    async fn exists(&self, claim: &UniquenessClaim) -> Result<bool, UnavailableError> {
        Ok(!self.reserved.insert(claim.clone()))
    }

    async fn release(&self, claim: &UniquenessClaim) -> Result<(), UnavailableError> {
        self.reserved.remove(claim);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn claim(value: &str) -> UniquenessClaim {
        UniquenessClaim::new("users", "username", &value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn first_lookup_reserves_the_value() {
        let index = InMemoryUniquenessIndex::new();
        assert!(!index.exists(&claim("alice")).await.unwrap());
        assert!(index.exists(&claim("alice")).await.unwrap());
        assert!(!index.exists(&claim("bob")).await.unwrap());
        assert_eq!(index.len(), 2);
    }

    #[tokio::test]
    async fn release_frees_the_value() {
        let index = InMemoryUniquenessIndex::new();
        assert!(index.register(claim("alice")));
        assert!(!index.register(claim("alice")));

        index.release(&claim("alice")).await.unwrap();
        assert!(!index.contains(&claim("alice")));
        assert!(!index.exists(&claim("alice")).await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_claims_have_a_single_winner() {
        let index = Arc::new(InMemoryUniquenessIndex::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let index = Arc::clone(&index);
                tokio::spawn(async move { index.exists(&claim("carol")).await.unwrap() })
            })
            .collect();

        let mut free = 0;
        for handle in handles {
            if !handle.await.unwrap() {
                free += 1;
            }
        }
        assert_eq!(free, 1);
    }
}
