//! typereg - 编译期封闭类型集合上的服务注册表
//!
//! 注册表由一组在编译期声明的服务类型参数化。调用方为每个类型绑定
//! 产出策略（依赖构造、固定实例或委托工厂），之后在任意时刻解析出值；
//! 具体实现、构造参数与所有权形式都与调用点解耦。
//!
//! 集合外的类型在编译期被拒绝，不存在运行期类型检查路径。
//!
//! ```
//! use typereg::{FromDeps, ServiceRegistry};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Config {
//!     level: u8,
//! }
//!
//! struct Logger {
//!     level: u8,
//! }
//!
//! impl FromDeps<(Config,)> for Logger {
//!     fn from_deps((config,): (Config,)) -> Self {
//!         Logger { level: config.level }
//!     }
//! }
//!
//! type Services = typereg::type_set![Config, Logger];
//!
//! let mut registry = ServiceRegistry::<Services>::new();
//! registry.register_instance(Config { level: 3 });
//! registry.with_params::<(Config,), _>().register_type::<Logger, Logger, _>();
//!
//! let logger = registry.resolve::<Logger, _>().unwrap();
//! assert_eq!(logger.level, 3);
//! ```

pub mod builder;
pub mod construct;
pub mod pipe;
pub mod registry;
pub mod typeset;

// Re-export commonly used items for convenience
pub use builder::{ResolveDeps, ServiceBuilder};
pub use construct::{FromDeps, IntoService, Ownership};
pub use pipe::Pipe;
pub use registry::{Members, Registrator, RegistryError, ServiceRegistry};
pub use typeset::{Cons, Contains, Here, Nil, There};
