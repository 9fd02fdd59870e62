use std::marker::PhantomData;

/// Decides whether a record belongs to the incremental slice.
pub trait Filter<R>: Send + Sync {
    fn should_keep(&self, record: &R) -> bool;
}

/// Pure, total mapping from one input record to one output record.
///
/// Implementations must not depend on other records or on external state:
/// partitions are transformed concurrently and in no particular order.
pub trait Transform<In, Out>: Send + Sync {
    fn apply(&self, record: In) -> Out;
}

/// Adapts a plain function or closure into a [`Transform`].
pub struct FnTransform<In, Out, F> {
    f: F,
    _types: PhantomData<fn(In) -> Out>,
}

impl<In, Out, F> FnTransform<In, Out, F>
where
    F: Fn(In) -> Out + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _types: PhantomData,
        }
    }
}

impl<In, Out, F> Transform<In, Out> for FnTransform<In, Out, F>
where
    F: Fn(In) -> Out + Send + Sync,
{
    fn apply(&self, record: In) -> Out {
        (self.f)(record)
    }
}
