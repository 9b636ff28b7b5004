//! A minimal reference [`Host`] implementation.
//!
//! The numeric tower, matrix/range backend, and function library are
//! deliberately external collaborators, consumed only through the
//! [`Host`] trait. [`ReferenceHost`] exists so this crate's own tests
//! have something concrete to compile and evaluate against — it is a
//! plain `f64`-backed host, not a production numeric stack. Embedders
//! are expected to supply their own [`Host`] (arbitrary precision,
//! units, a real matrix library) in its place.

use crate::error::MathError;
use crate::host::{DimIndex, Host, NumberMode};

#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceValue {
    Number(f64),
    Str(String),
    Boolean(bool),
    /// Row-major, always rectangular.
    Matrix(Vec<Vec<ReferenceValue>>),
    Undefined,
}

fn as_number(v: &ReferenceValue) -> Result<f64, MathError> {
    match v {
        ReferenceValue::Number(n) => Ok(*n),
        other => Err(MathError::HostError(format!("Expected a number, got {:?}", other))),
    }
}

fn values_equal(a: &ReferenceValue, b: &ReferenceValue) -> bool {
    match (a, b) {
        (ReferenceValue::Number(x), ReferenceValue::Number(y)) => x == y,
        (ReferenceValue::Str(x), ReferenceValue::Str(y)) => x == y,
        (ReferenceValue::Boolean(x), ReferenceValue::Boolean(y)) => x == y,
        (ReferenceValue::Undefined, ReferenceValue::Undefined) => true,
        (ReferenceValue::Matrix(x), ReferenceValue::Matrix(y)) => {
            x.len() == y.len()
                && x.iter().zip(y).all(|(ra, rb)| {
                    ra.len() == rb.len() && ra.iter().zip(rb).all(|(a, b)| values_equal(a, b))
                })
        }
        _ => false,
    }
}

const OPERATOR_NAMES: &[&str] = &[
    "add", "subtract", "multiply", "divide", "pow", "mod", "equal", "unequal", "smaller",
    "larger", "smallerEq", "largerEq", "factorial", "transpose", "unaryMinus", "unaryPlus",
    "not", "to", "dotMultiply", "dotDivide", "dotPow", "concat",
];

/// A handful of named functions, beyond the bare operator set, so
/// tests can exercise ordinary `FunctionCall`s (`f(x)` syntax) as well
/// as operators.
const LIBRARY_NAMES: &[&str] =
    &["sqrt", "sin", "cos", "abs", "floor", "ceil", "round", "min", "max", "sum"];

/// A `Host` backed by plain `f64` numbers, UTF-8 strings, booleans,
/// and row-major matrices of the above. No units, no arbitrary
/// precision, no broadcasting rules beyond what each test needs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceHost;

impl Host for ReferenceHost {
    type Value = ReferenceValue;

    fn number_mode(&self) -> NumberMode {
        NumberMode::Number
    }

    fn constant_number(&self, text: &str) -> Result<Self::Value, MathError> {
        text.parse::<f64>()
            .map(ReferenceValue::Number)
            .map_err(|_| MathError::syntax_no_offset(format!("Invalid number \"{}\"", text)))
    }

    fn constant_string(&self, text: &str) -> Self::Value {
        ReferenceValue::Str(text.to_string())
    }

    fn constant_boolean(&self, value: bool) -> Self::Value {
        ReferenceValue::Boolean(value)
    }

    fn undefined(&self) -> Self::Value {
        ReferenceValue::Undefined
    }

    fn truthy(&self, value: &Self::Value) -> bool {
        match value {
            ReferenceValue::Number(n) => *n != 0.0,
            ReferenceValue::Boolean(b) => *b,
            ReferenceValue::Undefined => false,
            ReferenceValue::Str(s) => !s.is_empty(),
            ReferenceValue::Matrix(rows) => !rows.is_empty(),
        }
    }

    fn is_operator(&self, name: &str) -> bool {
        OPERATOR_NAMES.contains(&name) || LIBRARY_NAMES.contains(&name)
    }

    fn call(&self, name: &str, args: Vec<Self::Value>) -> Result<Self::Value, MathError> {
        use ReferenceValue::*;
        match (name, args.as_slice()) {
            ("add", [Str(a), Str(b)]) => Ok(Str(format!("{}{}", a, b))),
            ("add", [a, b]) => Ok(Number(as_number(a)? + as_number(b)?)),
            ("subtract", [a, b]) => Ok(Number(as_number(a)? - as_number(b)?)),
            ("multiply" | "dotMultiply", [a, b]) => Ok(Number(as_number(a)? * as_number(b)?)),
            ("divide" | "dotDivide", [a, b]) => {
                let (a, b) = (as_number(a)?, as_number(b)?);
                if b == 0.0 {
                    return Err(MathError::HostError("Division by zero".to_string()));
                }
                Ok(Number(a / b))
            }
            ("pow" | "dotPow", [a, b]) => Ok(Number(as_number(a)?.powf(as_number(b)?))),
            ("mod", [a, b]) => {
                let (a, b) = (as_number(a)?, as_number(b)?);
                Ok(Number(((a % b) + b) % b))
            }
            ("equal", [a, b]) => Ok(Boolean(values_equal(a, b))),
            ("unequal", [a, b]) => Ok(Boolean(!values_equal(a, b))),
            ("smaller", [a, b]) => Ok(Boolean(as_number(a)? < as_number(b)?)),
            ("larger", [a, b]) => Ok(Boolean(as_number(a)? > as_number(b)?)),
            ("smallerEq", [a, b]) => Ok(Boolean(as_number(a)? <= as_number(b)?)),
            ("largerEq", [a, b]) => Ok(Boolean(as_number(a)? >= as_number(b)?)),
            ("unaryMinus", [a]) => Ok(Number(-as_number(a)?)),
            ("unaryPlus", [a]) => Ok(Number(as_number(a)?)),
            ("not", [a]) => Ok(Boolean(!self.truthy(a))),
            ("to", [a, _unit]) => Ok(a.clone()),
            ("factorial", [a]) => {
                let n = as_number(a)?;
                if n < 0.0 || n.fract() != 0.0 {
                    return Err(MathError::HostError(
                        "factorial requires a non-negative integer".to_string(),
                    ));
                }
                Ok(Number((1..=n as u64).product::<u64>() as f64))
            }
            ("transpose", [Matrix(rows)]) => {
                if rows.is_empty() {
                    return Ok(Matrix(vec![]));
                }
                let cols = rows[0].len();
                let mut out = vec![Vec::with_capacity(rows.len()); cols];
                for row in rows {
                    for (c, cell) in row.iter().enumerate() {
                        out[c].push(cell.clone());
                    }
                }
                Ok(Matrix(out))
            }
            ("transpose", [scalar]) => Ok(scalar.clone()),
            ("concat", [Str(a), Str(b)]) => Ok(Str(format!("{}{}", a, b))),
            ("concat", [Matrix(a), Matrix(b)]) => {
                let mut rows = a.clone();
                rows.extend(b.clone());
                Ok(Matrix(rows))
            }
            ("sqrt", [a]) => Ok(Number(as_number(a)?.sqrt())),
            ("sin", [a]) => Ok(Number(as_number(a)?.sin())),
            ("cos", [a]) => Ok(Number(as_number(a)?.cos())),
            ("abs", [a]) => Ok(Number(as_number(a)?.abs())),
            ("floor", [a]) => Ok(Number(as_number(a)?.floor())),
            ("ceil", [a]) => Ok(Number(as_number(a)?.ceil())),
            ("round", [a]) => Ok(Number(as_number(a)?.round())),
            ("min", [a, b]) => Ok(Number(as_number(a)?.min(as_number(b)?))),
            ("max", [a, b]) => Ok(Number(as_number(a)?.max(as_number(b)?))),
            ("sum", values) => {
                let mut total = 0.0;
                for v in values {
                    total += as_number(v)?;
                }
                Ok(Number(total))
            }
            (name, args) => Err(MathError::HostError(format!(
                "No overload of \"{}\" matches {} argument(s)",
                name,
                args.len()
            ))),
        }
    }

    fn range(
        &self,
        start: Self::Value,
        end: Self::Value,
        step: Self::Value,
    ) -> Result<Self::Value, MathError> {
        let (start, end, step) = (as_number(&start)?, as_number(&end)?, as_number(&step)?);
        if step == 0.0 {
            return Err(MathError::HostError("Range step must not be zero".to_string()));
        }
        let mut values = Vec::new();
        let mut current = start;
        let epsilon = 1e-9;
        if step > 0.0 {
            while current <= end + epsilon {
                values.push(ReferenceValue::Number(current));
                current += step;
            }
        } else {
            while current >= end - epsilon {
                values.push(ReferenceValue::Number(current));
                current += step;
            }
        }
        Ok(ReferenceValue::Matrix(vec![values]))
    }

    fn matrix(&self, rows: Vec<Vec<Self::Value>>) -> Result<Self::Value, MathError> {
        if let Some(first) = rows.first() {
            if rows.iter().any(|r| r.len() != first.len()) {
                return Err(MathError::DimensionError(
                    "Array dimensions mismatch".to_string(),
                ));
            }
        }
        Ok(ReferenceValue::Matrix(rows))
    }

    fn size(&self, object: &Self::Value, dimension: usize) -> Result<i64, MathError> {
        match (object, dimension) {
            (ReferenceValue::Str(s), 0) => Ok(s.chars().count() as i64),
            (ReferenceValue::Matrix(rows), 0) => Ok(rows.len() as i64),
            (ReferenceValue::Matrix(rows), 1) => {
                Ok(rows.first().map_or(0, |r| r.len()) as i64)
            }
            (ReferenceValue::Matrix(_), _) => Ok(1),
            (_, _) => Ok(1),
        }
    }

    fn subset_get(
        &self,
        object: &Self::Value,
        dims: &[DimIndex<Self::Value>],
    ) -> Result<Self::Value, MathError> {
        if let ReferenceValue::Str(s) = object {
            let chars: Vec<char> = s.chars().collect();
            let [dim] = dims else {
                return Err(MathError::DimensionError(
                    "A string only has one dimension".to_string(),
                ));
            };
            let indices = resolve_dim(dim, chars.len() as i64)?;
            let picked: String = indices.iter().map(|&i| chars[i as usize]).collect();
            return Ok(ReferenceValue::Str(picked));
        }
        let rows = as_rows(object)?;
        match dims {
            [row_dim] if rows.len() == 1 => {
                let indices = resolve_dim(row_dim, rows[0].len() as i64)?;
                let cells: Vec<ReferenceValue> =
                    indices.iter().map(|&i| rows[0][i as usize].clone()).collect();
                if let DimIndex::Single(_) = row_dim {
                    Ok(cells.into_iter().next().unwrap())
                } else {
                    Ok(ReferenceValue::Matrix(vec![cells]))
                }
            }
            [row_dim] => {
                let indices = resolve_dim(row_dim, rows.len() as i64)?;
                let selected: Vec<Vec<ReferenceValue>> =
                    indices.iter().map(|&i| rows[i as usize].clone()).collect();
                if let DimIndex::Single(_) = row_dim {
                    Ok(ReferenceValue::Matrix(vec![selected.into_iter().next().unwrap()]))
                } else {
                    Ok(ReferenceValue::Matrix(selected))
                }
            }
            [row_dim, col_dim] => {
                let row_indices = resolve_dim(row_dim, rows.len() as i64)?;
                let col_count = rows.first().map_or(0, |r| r.len()) as i64;
                let col_indices = resolve_dim(col_dim, col_count)?;
                let selected: Vec<Vec<ReferenceValue>> = row_indices
                    .iter()
                    .map(|&r| col_indices.iter().map(|&c| rows[r as usize][c as usize].clone()).collect())
                    .collect();
                if matches!(row_dim, DimIndex::Single(_)) && matches!(col_dim, DimIndex::Single(_)) {
                    Ok(selected[0][0].clone())
                } else {
                    Ok(ReferenceValue::Matrix(selected))
                }
            }
            other => Err(MathError::DimensionError(format!(
                "Index has {} dimensions, expected 1 or 2",
                other.len()
            ))),
        }
    }

    fn subset_set(
        &self,
        object: &Self::Value,
        dims: &[DimIndex<Self::Value>],
        replacement: Self::Value,
    ) -> Result<Self::Value, MathError> {
        if let ReferenceValue::Str(s) = object {
            let mut chars: Vec<char> = s.chars().collect();
            let [dim] = dims else {
                return Err(MathError::DimensionError(
                    "A string only has one dimension".to_string(),
                ));
            };
            let replacement_text = match &replacement {
                ReferenceValue::Str(r) => r.clone(),
                other => return Err(MathError::HostError(format!(
                    "Cannot assign {:?} into a string",
                    other
                ))),
            };
            let indices = resolve_dim(dim, chars.len() as i64)?;
            let replacement_chars: Vec<char> = replacement_text.chars().collect();
            if replacement_chars.len() != indices.len() {
                return Err(MathError::DimensionError(format!(
                    "Dimension mismatch ({} != {})",
                    replacement_chars.len(),
                    indices.len()
                )));
            }
            let widest = indices.iter().copied().max().unwrap_or(-1);
            if widest >= chars.len() as i64 {
                chars.resize((widest + 1) as usize, ' ');
            }
            for (&i, &c) in indices.iter().zip(replacement_chars.iter()) {
                chars[i as usize] = c;
            }
            return Ok(ReferenceValue::Str(chars.into_iter().collect()));
        }
        let mut rows = as_rows(object)?.clone();
        match dims {
            [dim] if rows.len() <= 1 => {
                if rows.is_empty() {
                    rows.push(vec![]);
                }
                let indices = resolve_dim_for_assignment(dim, rows[0].len() as i64)?;
                grow_row(&mut rows[0], &indices);
                let values = replacement_cells(&replacement, indices.len())?;
                for (&i, v) in indices.iter().zip(values.into_iter()) {
                    rows[0][i as usize] = v;
                }
                Ok(ReferenceValue::Matrix(rows))
            }
            [row_dim, col_dim] => {
                let row_indices =
                    resolve_dim_for_assignment(row_dim, rows.len() as i64)?;
                let col_indices = resolve_dim_for_assignment(
                    col_dim,
                    rows.first().map_or(0, |r| r.len()) as i64,
                )?;
                let widest_row = row_indices.iter().copied().max().unwrap_or(-1);
                if widest_row >= rows.len() as i64 {
                    rows.resize((widest_row + 1) as usize, vec![]);
                }
                let widest_col = col_indices.iter().copied().max().unwrap_or(-1);
                let target_cols =
                    (widest_col + 1).max(rows.iter().map(|r| r.len() as i64).max().unwrap_or(0));
                for row in rows.iter_mut() {
                    grow_row(row, &[target_cols - 1]);
                }
                let values = replacement_grid(&replacement, row_indices.len(), col_indices.len())?;
                for (ri, &r) in row_indices.iter().enumerate() {
                    for (ci, &c) in col_indices.iter().enumerate() {
                        rows[r as usize][c as usize] = values[ri][ci].clone();
                    }
                }
                Ok(ReferenceValue::Matrix(rows))
            }
            other => Err(MathError::DimensionError(format!(
                "Unsupported update shape with {} dimension(s)",
                other.len()
            ))),
        }
    }
}

fn as_rows(v: &ReferenceValue) -> Result<&Vec<Vec<ReferenceValue>>, MathError> {
    match v {
        ReferenceValue::Matrix(rows) => Ok(rows),
        other => Err(MathError::HostError(format!("{:?} is not indexable", other))),
    }
}

fn resolve_dim(dim: &DimIndex<ReferenceValue>, size: i64) -> Result<Vec<i64>, MathError> {
    match dim {
        DimIndex::Single(v) => Ok(vec![resolve_index(v, size)?]),
        DimIndex::Range { start, end, step } => {
            let start = resolve_index(start, size)?;
            let end = resolve_index(end, size)?;
            let step = as_number(step)? as i64;
            if step == 0 {
                return Err(MathError::HostError("Range step must not be zero".to_string()));
            }
            let mut out = Vec::new();
            let mut current = start;
            if step > 0 {
                while current <= end {
                    out.push(current);
                    current += step;
                }
            } else {
                while current >= end {
                    out.push(current);
                    current += step;
                }
            }
            Ok(out)
        }
        DimIndex::All => Ok((0..size).collect()),
    }
}

fn resolve_index(v: &ReferenceValue, size: i64) -> Result<i64, MathError> {
    let index = as_number(v)? as i64 - 1;
    if index < 0 {
        return Err(MathError::IndexTooSmall { index });
    }
    if index >= size {
        return Err(MathError::IndexTooLarge { index, max: size - 1 });
    }
    Ok(index)
}

/// Like [`resolve_index`], but for the left-hand side of an
/// `UpdateNode`: assignment may address positions beyond the
/// container's current bounds, growing it, so only the lower bound
/// (1-based indices start at 1) is enforced here.
fn resolve_index_for_assignment(v: &ReferenceValue) -> Result<i64, MathError> {
    let index = as_number(v)? as i64 - 1;
    if index < 0 {
        return Err(MathError::IndexTooSmall { index });
    }
    Ok(index)
}

fn resolve_dim_for_assignment(
    dim: &DimIndex<ReferenceValue>,
    current_size: i64,
) -> Result<Vec<i64>, MathError> {
    match dim {
        DimIndex::Single(v) => Ok(vec![resolve_index_for_assignment(v)?]),
        DimIndex::Range { start, end, step } => {
            let start = resolve_index_for_assignment(start)?;
            let end = resolve_index_for_assignment(end)?;
            let step = as_number(step)? as i64;
            if step == 0 {
                return Err(MathError::HostError("Range step must not be zero".to_string()));
            }
            let mut out = Vec::new();
            let mut current = start;
            if step > 0 {
                while current <= end {
                    out.push(current);
                    current += step;
                }
            } else {
                while current >= end {
                    out.push(current);
                    current += step;
                }
            }
            Ok(out)
        }
        DimIndex::All => Ok((0..current_size).collect()),
    }
}

/// Grows `row` so every index in `indices` is addressable, padding new
/// cells with `0` (resizing a numeric matrix fills the new cells with
/// zero, not `undefined`).
fn grow_row(row: &mut Vec<ReferenceValue>, indices: &[i64]) {
    let widest = indices.iter().copied().max().unwrap_or(-1);
    if widest >= row.len() as i64 {
        row.resize((widest + 1) as usize, ReferenceValue::Number(0.0));
    }
}

/// Extracts `count` replacement values for a 1-D assignment target. A
/// single-index assignment (`a[3] = 5`) accepts a bare scalar; a
/// multi-index assignment (`a[2:3] = [5, 6]`) requires a matching
/// one-row matrix.
fn replacement_cells(replacement: &ReferenceValue, count: usize) -> Result<Vec<ReferenceValue>, MathError> {
    if count == 1 {
        if let ReferenceValue::Matrix(rows) = replacement {
            if rows.len() == 1 && rows[0].len() == 1 {
                return Ok(vec![rows[0][0].clone()]);
            }
        } else {
            return Ok(vec![replacement.clone()]);
        }
    }
    match replacement {
        ReferenceValue::Matrix(rows) if rows.len() == 1 && rows[0].len() == count => {
            Ok(rows[0].clone())
        }
        other => Err(MathError::DimensionError(format!(
            "Dimension mismatch ({:?} does not fit {} target cell(s))",
            other, count
        ))),
    }
}

/// Extracts a `rows x cols` replacement grid for a 2-D assignment
/// target, with the same single-cell scalar shortcut as
/// [`replacement_cells`].
fn replacement_grid(
    replacement: &ReferenceValue,
    rows: usize,
    cols: usize,
) -> Result<Vec<Vec<ReferenceValue>>, MathError> {
    if rows == 1 && cols == 1 {
        if let ReferenceValue::Matrix(grid) = replacement {
            if grid.len() == 1 && grid[0].len() == 1 {
                return Ok(vec![vec![grid[0][0].clone()]]);
            }
        } else {
            return Ok(vec![vec![replacement.clone()]]);
        }
    }
    match replacement {
        ReferenceValue::Matrix(grid) if grid.len() == rows && grid.iter().all(|r| r.len() == cols) => {
            Ok(grid.clone())
        }
        other => Err(MathError::DimensionError(format!(
            "Dimension mismatch ({:?} does not fit a {}x{} target)",
            other, rows, cols
        ))),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn arithmetic() {
        let host = ReferenceHost;
        let result = host
            .call("add", vec![ReferenceValue::Number(2.0), ReferenceValue::Number(3.0)])
            .unwrap();
        assert_eq!(result, ReferenceValue::Number(5.0));
    }

    #[test]
    fn range_counts_up() {
        let host = ReferenceHost;
        let result = host
            .range(ReferenceValue::Number(1.0), ReferenceValue::Number(3.0), ReferenceValue::Number(1.0))
            .unwrap();
        assert_eq!(
            result,
            ReferenceValue::Matrix(vec![vec![
                ReferenceValue::Number(1.0),
                ReferenceValue::Number(2.0),
                ReferenceValue::Number(3.0)
            ]])
        );
    }

    #[test]
    fn index_out_of_range_is_reported_zero_based() {
        let host = ReferenceHost;
        let matrix = ReferenceValue::Matrix(vec![vec![ReferenceValue::Number(1.0)]]);
        let err = host
            .subset_get(&matrix, &[DimIndex::Single(ReferenceValue::Number(5.0))])
            .unwrap_err();
        assert_eq!(err, MathError::IndexTooLarge { index: 4, max: 0 });
    }
}
