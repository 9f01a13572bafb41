//! 缓存层，支持 Moka（进程内）与 Redis 两种后端，经注册表按配置选择

pub mod object_cache;
pub mod register;
pub mod traits;

pub use traits::{CacheResult, ObjectCache};

/// 声明并注册一个缓存后端插件。
/// 借助 ctor 在进程启动时把构造函数写入注册表，启动流程再按配置取用。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $cache_type:ident) => {
        paste::paste! {
            #[ctor::ctor]
            #[allow(non_snake_case)]
            fn [<__register_object_cache_plugin_ $cache_type>]() {
                $crate::cache::register::register_object_cache_plugin(
                    $name,
                    std::sync::Arc::new(|| {
                        Box::pin(async {
                            match $cache_type::new() {
                                Ok(cache) => {
                                    Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                                }
                                Err(e) => {
                                    Err($crate::errors::AssessmentError::cache_connection(e))
                                }
                            }
                        })
                            as $crate::cache::register::BoxedObjectCacheFuture
                    }),
                );
            }
        }
    };
}
