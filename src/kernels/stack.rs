//! Several kernel mappers applied to the same feature column, outputs concatenated.
//!
//! Useful for mixing bandwidths: `[RFF(stddev=1), RFF(stddev=5)]` gives a linear
//! model access to both a narrow and a wide similarity at once.

use super::{KernelMapper, map_rows};
use crate::error::{KernelError, Result};
use num_traits::Float;

type BoxedMapper<F> = Box<dyn KernelMapper<F> + Send + Sync>;

pub struct MapperStack<F: Float> {
    mappers: Vec<BoxedMapper<F>>,
}

impl<F: Float> Default for MapperStack<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> MapperStack<F> {
    pub fn new() -> Self {
        MapperStack { mappers: Vec::new() }
    }

    /// Appends a mapper. Its input dim must match the mappers already in the stack.
    pub fn push<M>(&mut self, mapper: M) -> Result<()>
    where
        M: KernelMapper<F> + Send + Sync + 'static,
    {
        if let Some(first) = self.mappers.first() {
            if mapper.input_dim() != first.input_dim() {
                return Err(KernelError::DimensionMismatch {
                    expected: first.input_dim(),
                    actual: mapper.input_dim(),
                });
            }
        }
        self.mappers.push(Box::new(mapper));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.mappers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }
}

impl<F: Float> KernelMapper<F> for MapperStack<F> {
    fn name(&self) -> &str {
        "MapperStack"
    }

    fn input_dim(&self) -> usize {
        self.mappers.first().map_or(0, |m| m.input_dim())
    }

    fn output_dim(&self) -> usize {
        self.mappers.iter().map(|m| m.output_dim()).sum()
    }

    fn map(&self, features: &[F]) -> Result<Vec<F>> {
        if self.mappers.is_empty() {
            return Err(KernelError::EmptyStack);
        }
        let mut output = Vec::with_capacity(self.output_dim());
        for mapper in &self.mappers {
            output.extend(mapper.map(features)?);
        }
        Ok(output)
    }

    fn map_batch(&self, rows: &[Vec<F>]) -> Result<Vec<Vec<F>>> {
        if self.mappers.is_empty() {
            return Err(KernelError::EmptyStack);
        }
        map_rows(self, rows)
    }
}

impl<F: Float> std::fmt::Debug for MapperStack<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.mappers.iter().map(|m| m.name()).collect();
        f.debug_struct("MapperStack").field("mappers", &names).finish()
    }
}
