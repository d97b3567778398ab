//! 编译期封闭类型集合
//!
//! 提供类型级列表与集合成员判定，注册表用它在编译期拒绝集合外的类型：
//! - `Nil` / `Cons` 组成类型级列表
//! - `Here` / `There` 是成员位置的类型级索引
//! - `Contains<T, I>` 是"列表包含 T，位于索引 I"的见证
//!
//! 纯编译期机制，不携带任何运行期状态。

use std::marker::PhantomData;

/// 空类型列表
pub struct Nil;

/// 类型列表节点：头部类型 `H`，尾部列表 `T`
pub struct Cons<H, T>(PhantomData<(H, T)>);

/// 索引：成员就在列表头部
pub struct Here;

/// 索引：成员在尾部列表的索引 `I` 处
pub struct There<I>(PhantomData<I>);

/// 集合成员见证：列表 `Self` 在索引 `I` 处包含类型 `T`
///
/// 索引参数让头部命中与尾部递归两条推导路径互不重叠，调用方一律写 `_`
/// 由编译器推断。集合外的类型不存在任何 `Contains` 实现，
/// 因此相关操作直接无法实例化。
pub trait Contains<T, I> {}

impl<T, Rest> Contains<T, Here> for Cons<T, Rest> {}

impl<T, H, Rest, I> Contains<T, There<I>> for Cons<H, Rest> where Rest: Contains<T, I> {}

/// 声明一个封闭类型集合
///
/// 展开为 `Cons`/`Nil` 链。成员必须两两不同：重复成员会让索引见证
/// 产生歧义，对该类型的注册与解析将无法通过类型推断。
///
/// ```
/// type Services = typereg::type_set![u32, String];
/// ```
#[macro_export]
macro_rules! type_set {
    () => { $crate::typeset::Nil };
    ($head:ty $(,)?) => {
        $crate::typeset::Cons<$head, $crate::typeset::Nil>
    };
    ($head:ty, $($rest:ty),+ $(,)?) => {
        $crate::typeset::Cons<$head, $crate::type_set!($($rest),+)>
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    type Set = crate::type_set![u8, String, Vec<i32>];

    fn assert_member<T, I>()
    where
        Set: Contains<T, I>,
    {
    }

    #[test]
    fn membership_witness_holds_for_each_member() {
        assert_member::<u8, _>();
        assert_member::<String, _>();
        assert_member::<Vec<i32>, _>();
    }
}
