//! 编译期受限的服务注册表实现
//!
//! 特性：
//! - 封闭类型集合：集合由注册表的类型参数声明，集合外类型在编译期拒绝
//! - 槽位常驻：构造时每个成员槽位播种未注册策略，注册只替换、不清空
//! - 递归构造：构造策略沿注册顺序在同一调用栈上解析依赖
//! - 单线程使用：无内部同步，"先配置、后使用"由调用方保证
//!
//! 依赖环不做检测：互相依赖的构造策略会在解析时无界递归直至栈耗尽，
//! 这是明确保留的已知限制。

use std::any::{self, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use crate::builder::{
    ConstructBuilder, FnBuilder, InstanceBuilder, ResolveDeps, ServiceBuilder, UnregisteredBuilder,
};
use crate::construct::{FromDeps, IntoService};
use crate::typeset::{Cons, Contains, Nil};

/// 注册表错误类型
#[derive(Debug)]
pub enum RegistryError {
    /// 类型在集合内，但槽位仍是未注册策略
    ServiceNotRegistered { service: &'static str },
    /// 槽位中的策略与请求类型不一致；写入路径固定键值对应，正常使用不可达
    TypeCastFailed {
        expected: &'static str,
        actual: &'static str,
    },
    /// 用户工厂返回了错误
    CreationFailed {
        service: &'static str,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::ServiceNotRegistered { service } => {
                write!(f, "Service not registered: {}", service)
            }
            RegistryError::TypeCastFailed { expected, actual } => {
                write!(f, "Slot type cast failed: expected {}, got {}", expected, actual)
            }
            RegistryError::CreationFailed { service, source } => {
                write!(f, "Service creation failed for {}: {}", service, source)
            }
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistryError::CreationFailed { source, .. } => {
                let source: &(dyn std::error::Error + 'static) = source.as_ref();
                Some(source)
            }
            _ => None,
        }
    }
}

type BoxedBuilder<T, S> = Box<dyn ServiceBuilder<T, S>>;

/// 单个槽位：成员类型名加类型擦除后的策略
///
/// 擦除层里存放的具体类型固定为 `Box<dyn ServiceBuilder<T, S>>`，
/// 播种与注册两条写入路径都以 `TypeId::of::<T>()` 为键写入同样的类型，
/// 因此取回时的向下转型不会失败。
pub struct SlotCell {
    service: &'static str,
    builder: Box<dyn Any>,
}

impl SlotCell {
    fn vacant<T: 'static, S: 'static>() -> Self {
        SlotCell::bound::<T, S>(UnregisteredBuilder)
    }

    fn bound<T: 'static, S: 'static>(builder: impl ServiceBuilder<T, S> + 'static) -> Self {
        let builder: BoxedBuilder<T, S> = Box::new(builder);
        SlotCell {
            service: any::type_name::<T>(),
            builder: Box::new(builder),
        }
    }

    fn typed<T: 'static, S: 'static>(&self) -> Result<&BoxedBuilder<T, S>, RegistryError> {
        self.builder
            .downcast_ref::<BoxedBuilder<T, S>>()
            .ok_or(RegistryError::TypeCastFailed {
                expected: any::type_name::<T>(),
                actual: self.service,
            })
    }
}

/// 集合成员遍历，构造注册表时为每个成员播种未注册槽位
///
/// 由 `Nil`/`Cons` 组成的集合类型自动实现，使用方无需关心。
pub trait Members<S> {
    fn seed(slots: &mut HashMap<TypeId, SlotCell>);
}

impl<S> Members<S> for Nil {
    fn seed(_slots: &mut HashMap<TypeId, SlotCell>) {}
}

impl<S, H, T> Members<S> for Cons<H, T>
where
    S: 'static,
    H: 'static,
    T: Members<S>,
{
    fn seed(slots: &mut HashMap<TypeId, SlotCell>) {
        slots.insert(TypeId::of::<H>(), SlotCell::vacant::<H, S>());
        T::seed(slots);
    }
}

/// 封闭类型集合上的服务注册表
///
/// `S` 是用 [`type_set!`](crate::type_set) 声明的集合，作为注册表类型的一部分，
/// 生命周期内不可变。注册与解析操作都带 `Contains` 约束，
/// 集合外的类型无法实例化出对应代码：
///
/// ```compile_fail
/// type Services = typereg::type_set![u32];
/// let registry = typereg::ServiceRegistry::<Services>::new();
/// let _ = registry.resolve::<String, _>();
/// ```
///
/// 解析取 `&self`、注册取 `&mut self`，解析进行中无法触发注册。
pub struct ServiceRegistry<S> {
    slots: HashMap<TypeId, SlotCell>,
    _set: PhantomData<S>,
}

impl<S> ServiceRegistry<S>
where
    S: Members<S> + 'static,
{
    /// 创建注册表，所有成员槽位初始化为未注册策略
    pub fn new() -> Self {
        let mut slots = HashMap::new();
        S::seed(&mut slots);
        ServiceRegistry {
            slots,
            _set: PhantomData,
        }
    }
}

impl<S> Default for ServiceRegistry<S>
where
    S: Members<S> + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static> ServiceRegistry<S> {
    /// 为 `T` 的槽位绑定任意策略，替换原有策略
    ///
    /// 各 `register_*` 便捷方法最终都经由这里写入。
    pub fn register_builder<T, I, B>(&mut self, builder: B)
    where
        T: 'static,
        B: ServiceBuilder<T, S> + 'static,
        S: Contains<T, I>,
    {
        log::debug!(
            "binding slot {} -> {}",
            any::type_name::<T>(),
            any::type_name::<B>()
        );
        self.slots
            .insert(TypeId::of::<T>(), SlotCell::bound::<T, S>(builder));
    }

    /// 注册构造策略，依赖列表为空
    ///
    /// `Impl` 需要零依赖构造（`FromDeps<()>`），`Iface` 与 `Impl` 相同时
    /// 恒等转换直接可用。Rust 的函数泛型没有默认参数，接口即实现时
    /// 两个类型都要写出。
    pub fn register_type<Iface, Impl, I>(&mut self)
    where
        Iface: 'static,
        Impl: FromDeps<()> + IntoService<Iface> + 'static,
        S: Contains<Iface, I>,
    {
        self.register_builder::<Iface, I, _>(ConstructBuilder::<Impl, (), ()>::new());
    }

    /// 注册委托工厂，每次解析调用一次
    pub fn register_factory<T, I, F>(&mut self, factory: F)
    where
        T: 'static,
        F: Fn() -> T + 'static,
        S: Contains<T, I>,
    {
        self.register_try_factory::<T, I, _>(move || Ok(factory()));
    }

    /// 注册可失败的委托工厂，工厂错误原样携带在 [`RegistryError::CreationFailed`] 中
    pub fn register_try_factory<T, I, F>(&mut self, factory: F)
    where
        T: 'static,
        F: Fn() -> Result<T, Box<dyn std::error::Error + Send + Sync>> + 'static,
        S: Contains<T, I>,
    {
        self.register_builder::<T, I, _>(FnBuilder { factory });
    }

    /// 注册固定实例，每次解析返回一个拷贝
    ///
    /// 存储值不对外暴露引用，解析出的值与后续解析互不影响。
    pub fn register_instance<T, I>(&mut self, instance: T)
    where
        T: Clone + 'static,
        S: Contains<T, I>,
    {
        self.register_builder::<T, I, _>(InstanceBuilder { instance });
    }

    /// 打开参数化注册作用域，预先捕获依赖类型列表 `Deps`
    ///
    /// 同一作用域可连续为多个接口注册构造策略，依赖列表不必重复书写。
    pub fn with_params<Deps, Ix>(&mut self) -> Registrator<'_, S, Deps, Ix>
    where
        Deps: ResolveDeps<S, Ix>,
    {
        Registrator {
            registry: self,
            _params: PhantomData,
        }
    }

    /// 解析服务 - 主要API
    ///
    /// 查找 `T` 的槽位并调用其当前策略。未注册返回
    /// [`RegistryError::ServiceNotRegistered`]；构造策略在同一调用栈上
    /// 递归解析依赖，依赖环会无界递归，不做检测。
    pub fn resolve<T, I>(&self) -> Result<T, RegistryError>
    where
        T: 'static,
        S: Contains<T, I>,
    {
        log::trace!("resolving {}", any::type_name::<T>());
        let cell = match self.slots.get(&TypeId::of::<T>()) {
            Some(cell) => cell,
            None => {
                return Err(RegistryError::ServiceNotRegistered {
                    service: any::type_name::<T>(),
                })
            }
        };
        cell.typed::<T, S>()?.build(self)
    }

    /// 槽位是否已绑定过实际策略
    pub fn is_registered<T, I>(&self) -> bool
    where
        T: 'static,
        S: Contains<T, I>,
    {
        match self.slots.get(&TypeId::of::<T>()) {
            Some(cell) => cell.typed::<T, S>().map(|b| b.is_bound()).unwrap_or(false),
            None => false,
        }
    }
}

impl<S> fmt::Debug for ServiceRegistry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut services: Vec<&str> = self.slots.values().map(|cell| cell.service).collect();
        services.sort_unstable();
        f.debug_struct("ServiceRegistry")
            .field("services", &services)
            .finish()
    }
}

/// 参数化注册作用域
///
/// 持有注册表的可变借用与预捕获的依赖类型列表。作用域可复用，
/// 其生命周期被借用检查限制在注册调用链内，不需要显式关闭。
pub struct Registrator<'r, S, Deps, Ix> {
    registry: &'r mut ServiceRegistry<S>,
    _params: PhantomData<fn() -> (Deps, Ix)>,
}

impl<S, Deps, Ix> Registrator<'_, S, Deps, Ix>
where
    S: 'static,
    Deps: ResolveDeps<S, Ix> + 'static,
    Ix: 'static,
{
    /// 为 `Iface` 绑定构造策略，依赖列表正是作用域捕获的 `Deps`
    pub fn register_type<Iface, Impl, I>(&mut self)
    where
        Iface: 'static,
        Impl: FromDeps<Deps> + IntoService<Iface> + 'static,
        S: Contains<Iface, I>,
    {
        self.registry
            .register_builder::<Iface, I, _>(ConstructBuilder::<Impl, Deps, Ix>::new());
    }
}

/// 便捷解析宏，省去显式的索引占位参数
#[macro_export]
macro_rules! resolve {
    ($registry:expr, $ty:ty) => {
        $registry.resolve::<$ty, _>()
    };
}
