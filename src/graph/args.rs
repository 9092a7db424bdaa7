use crate::param::slot::{BufferRef, ParamSlot};

/// Positional operator arguments.
///
/// Lets builder calls read like the live-coding source: `shape(50, 0.4, 0.2)`,
/// `osc(23, -0.05, 1000)`, `noise(())` for all defaults.
pub trait IntoArgs {
    /// Convert into the ordered slot list.
    fn into_args(self) -> Vec<ParamSlot>;
}

impl IntoArgs for () {
    fn into_args(self) -> Vec<ParamSlot> {
        Vec::new()
    }
}

macro_rules! single_arg {
    ($($t:ty),*) => {
        $(
            impl IntoArgs for $t {
                fn into_args(self) -> Vec<ParamSlot> {
                    vec![ParamSlot::from(self)]
                }
            }
        )*
    };
}

single_arg!(f64, f32, i32, ParamSlot, BufferRef);

impl IntoArgs for Vec<ParamSlot> {
    fn into_args(self) -> Vec<ParamSlot> {
        self
    }
}

impl<T: Into<ParamSlot>, const N: usize> IntoArgs for [T; N] {
    fn into_args(self) -> Vec<ParamSlot> {
        self.into_iter().map(Into::into).collect()
    }
}

macro_rules! tuple_args {
    ($($name:ident),+) => {
        impl<$($name: Into<ParamSlot>),+> IntoArgs for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_args(self) -> Vec<ParamSlot> {
                let ($($name,)+) = self;
                vec![$($name.into()),+]
            }
        }
    };
}

tuple_args!(A);
tuple_args!(A, B);
tuple_args!(A, B, C);
tuple_args!(A, B, C, D);
tuple_args!(A, B, C, D, E);
tuple_args!(A, B, C, D, E, F);
