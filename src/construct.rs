//! 所有权类别与构造能力
//!
//! 构造策略解析完依赖后，需要决定实现类型的分配方式：引用计数句柄、
//! 独占句柄还是普通值。分支完全由实现类型的静态形状选择，
//! 不存在运行期类型标签。

use std::rc::Rc;
use std::sync::Arc;

/// 实现类型的所有权类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// 引用计数句柄（`Rc`/`Arc`）- 新分配目标值并包装进新句柄
    ReferenceCounted,
    /// 独占句柄（`Box`）- 新分配目标值，独占所有权
    SoleOwned,
    /// 普通值 - 直接按值构造返回
    Plain,
}

/// 从依赖元组构造自身
///
/// `Deps` 是有序的依赖值元组（可以为空）。注册表的构造策略先按声明顺序
/// 解析出依赖值，再调用 [`FromDeps::from_deps`] 完成构造。
///
/// 对 `Rc<E>`/`Arc<E>`/`Box<E>` 的转发实现即所有权分派：目标 `E` 用依赖值
/// 构造后装入新句柄。普通类型自行实现（零依赖的 `Default` 类型可用
/// [`from_deps!`](crate::from_deps) 宏生成）。
pub trait FromDeps<Deps>: Sized {
    /// 静态所有权类别，由实现类型的形状决定
    const OWNERSHIP: Ownership = Ownership::Plain;

    fn from_deps(deps: Deps) -> Self;
}

impl<Deps, E> FromDeps<Deps> for Rc<E>
where
    E: FromDeps<Deps>,
{
    const OWNERSHIP: Ownership = Ownership::ReferenceCounted;

    fn from_deps(deps: Deps) -> Self {
        Rc::new(E::from_deps(deps))
    }
}

impl<Deps, E> FromDeps<Deps> for Arc<E>
where
    E: FromDeps<Deps>,
{
    const OWNERSHIP: Ownership = Ownership::ReferenceCounted;

    fn from_deps(deps: Deps) -> Self {
        Arc::new(E::from_deps(deps))
    }
}

impl<Deps, E> FromDeps<Deps> for Box<E>
where
    E: FromDeps<Deps>,
{
    const OWNERSHIP: Ownership = Ownership::SoleOwned;

    fn from_deps(deps: Deps) -> Self {
        Box::new(E::from_deps(deps))
    }
}

/// 实现值到接口槽位类型的转换
///
/// 恒等覆盖实现即接口的场景。接口是 trait 对象句柄时，
/// 为具体句柄补一行实现即可（返回位置发生到 trait 对象的隐式转换）：
///
/// ```
/// use std::rc::Rc;
/// use typereg::IntoService;
///
/// trait Log {}
/// struct ConsoleLogger;
/// impl Log for ConsoleLogger {}
///
/// impl IntoService<Rc<dyn Log>> for Rc<ConsoleLogger> {
///     fn into_service(self) -> Rc<dyn Log> {
///         self
///     }
/// }
/// ```
pub trait IntoService<S>: Sized {
    fn into_service(self) -> S;
}

impl<T> IntoService<T> for T {
    fn into_service(self) -> T {
        self
    }
}

/// 为普通类型生成 [`FromDeps`] 实现
///
/// 单参数形式走 `Default`，闭包形式显式列出依赖：
///
/// ```
/// #[derive(Default)]
/// struct Cache;
/// typereg::from_deps!(Cache);
///
/// struct Warmed { size: usize }
/// typereg::from_deps!(Warmed, |cache: Cache| {
///     let _ = cache;
///     Warmed { size: 16 }
/// });
/// ```
#[macro_export]
macro_rules! from_deps {
    ($ty:ty) => {
        impl $crate::construct::FromDeps<()> for $ty {
            fn from_deps(_: ()) -> Self {
                <$ty as ::std::default::Default>::default()
            }
        }
    };
    ($ty:ty, |$($arg:ident : $dep:ty),* $(,)?| $body:expr) => {
        impl $crate::construct::FromDeps<($($dep,)*)> for $ty {
            fn from_deps(($($arg,)*): ($($dep,)*)) -> Self {
                $body
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default, Debug, PartialEq)]
    struct Widget {
        size: u32,
    }

    crate::from_deps!(Widget);

    struct Gauge {
        size: u32,
    }

    crate::from_deps!(Gauge, |widget: Widget| Gauge { size: widget.size + 1 });

    #[test]
    fn ownership_follows_handle_shape() {
        assert_eq!(<Widget as FromDeps<()>>::OWNERSHIP, Ownership::Plain);
        assert_eq!(
            <Rc<Widget> as FromDeps<()>>::OWNERSHIP,
            Ownership::ReferenceCounted
        );
        assert_eq!(
            <Arc<Widget> as FromDeps<()>>::OWNERSHIP,
            Ownership::ReferenceCounted
        );
        assert_eq!(<Box<Widget> as FromDeps<()>>::OWNERSHIP, Ownership::SoleOwned);
    }

    #[test]
    fn handle_impls_allocate_fresh_targets() {
        let a = Rc::<Widget>::from_deps(());
        let b = Rc::<Widget>::from_deps(());
        assert!(!Rc::ptr_eq(&a, &b));
        assert_eq!(*a, Widget::default());

        let boxed = Box::<Widget>::from_deps(());
        assert_eq!(*boxed, Widget::default());
    }

    #[test]
    fn from_deps_macro_passes_dependencies() {
        let gauge = Gauge::from_deps((Widget { size: 7 },));
        assert_eq!(gauge.size, 8);
    }

    #[test]
    fn identity_conversion_is_a_no_op() {
        let widget = Widget { size: 3 };
        let same: Widget = widget.into_service();
        assert_eq!(same.size, 3);
    }
}
