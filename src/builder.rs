//! 槽位构建策略
//!
//! 每个槽位持有一个策略，解析时调用 [`ServiceBuilder::build`] 产出一个值。
//! 内置四种策略：未注册、构造、实例复制、委托工厂。
//! 策略不持有注册表引用，递归解析所需的注册表由 `build` 的参数传入。

use std::any;
use std::marker::PhantomData;

use crate::construct::{FromDeps, IntoService};
use crate::registry::{RegistryError, ServiceRegistry};
use crate::typeset::Contains;

/// 构建策略：为类型 `T` 产出一个值
///
/// `S` 是注册表的类型集合。内置策略覆盖常规用法；
/// 通过 [`ServiceRegistry::register_builder`] 也可绑定自定义策略。
pub trait ServiceBuilder<T, S> {
    /// 产出一个值，构造策略会借助传入的注册表递归解析依赖
    fn build(&self, registry: &ServiceRegistry<S>) -> Result<T, RegistryError>;

    /// 槽位是否已绑定过实际策略
    fn is_bound(&self) -> bool {
        true
    }
}

/// 初始策略：产出值总是失败
pub(crate) struct UnregisteredBuilder;

impl<T, S> ServiceBuilder<T, S> for UnregisteredBuilder {
    fn build(&self, _registry: &ServiceRegistry<S>) -> Result<T, RegistryError> {
        Err(RegistryError::ServiceNotRegistered {
            service: any::type_name::<T>(),
        })
    }

    fn is_bound(&self) -> bool {
        false
    }
}

/// 实例复制策略：每次解析返回存储值的一个拷贝
pub(crate) struct InstanceBuilder<T> {
    pub(crate) instance: T,
}

impl<T: Clone, S> ServiceBuilder<T, S> for InstanceBuilder<T> {
    fn build(&self, _registry: &ServiceRegistry<S>) -> Result<T, RegistryError> {
        Ok(self.instance.clone())
    }
}

/// 委托策略：每次解析重新调用用户工厂，不做缓存
pub(crate) struct FnBuilder<F> {
    pub(crate) factory: F,
}

impl<T, S, F> ServiceBuilder<T, S> for FnBuilder<F>
where
    F: Fn() -> Result<T, Box<dyn std::error::Error + Send + Sync>>,
{
    fn build(&self, _registry: &ServiceRegistry<S>) -> Result<T, RegistryError> {
        (self.factory)().map_err(|source| RegistryError::CreationFailed {
            service: any::type_name::<T>(),
            source,
        })
    }
}

/// 构造策略：按声明顺序解析依赖元组 `Deps`，用结果构造 `Impl`，
/// 再转换为槽位的接口类型
pub(crate) struct ConstructBuilder<Impl, Deps, Ix> {
    _marker: PhantomData<fn() -> (Impl, Deps, Ix)>,
}

impl<Impl, Deps, Ix> ConstructBuilder<Impl, Deps, Ix> {
    pub(crate) fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<S, Iface, Impl, Deps, Ix> ServiceBuilder<Iface, S> for ConstructBuilder<Impl, Deps, Ix>
where
    S: 'static,
    Impl: FromDeps<Deps> + IntoService<Iface>,
    Deps: ResolveDeps<S, Ix>,
{
    fn build(&self, registry: &ServiceRegistry<S>) -> Result<Iface, RegistryError> {
        log::trace!(
            "constructing {} as {} ({:?})",
            any::type_name::<Iface>(),
            any::type_name::<Impl>(),
            <Impl as FromDeps<Deps>>::OWNERSHIP
        );
        let deps = Deps::resolve_deps(registry)?;
        Ok(Impl::from_deps(deps).into_service())
    }
}

/// 依赖元组的递归解析
///
/// 元组成员按从左到右的顺序逐个经注册表解析，任一失败立即向上返回。
/// `Ix` 是各依赖在集合中的索引元组，由编译器推断。
pub trait ResolveDeps<S, Ix>: Sized {
    fn resolve_deps(registry: &ServiceRegistry<S>) -> Result<Self, RegistryError>;
}

impl<S: 'static> ResolveDeps<S, ()> for () {
    fn resolve_deps(_registry: &ServiceRegistry<S>) -> Result<Self, RegistryError> {
        Ok(())
    }
}

macro_rules! impl_resolve_deps {
    ($($dep:ident => $idx:ident),+) => {
        impl<S: 'static, $($dep: 'static, $idx),+> ResolveDeps<S, ($($idx,)+)> for ($($dep,)+)
        where
            $(S: Contains<$dep, $idx>,)+
        {
            fn resolve_deps(registry: &ServiceRegistry<S>) -> Result<Self, RegistryError> {
                Ok(($(registry.resolve::<$dep, $idx>()?,)+))
            }
        }
    };
}

impl_resolve_deps!(A => IA);
impl_resolve_deps!(A => IA, B => IB);
impl_resolve_deps!(A => IA, B => IB, C => IC);
impl_resolve_deps!(A => IA, B => IB, C => IC, D => ID);
impl_resolve_deps!(A => IA, B => IB, C => IC, D => ID, E => IE);
impl_resolve_deps!(A => IA, B => IB, C => IC, D => ID, E => IE, F => IF);
impl_resolve_deps!(A => IA, B => IB, C => IC, D => ID, E => IE, F => IF, G => IG);
impl_resolve_deps!(A => IA, B => IB, C => IC, D => ID, E => IE, F => IF, G => IG, H => IH);
