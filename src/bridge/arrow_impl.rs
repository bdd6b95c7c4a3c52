// In: src/bridge/arrow_impl.rs

use arrow::array::{Array, ArrayRef, AsArray, RecordBatch};
use arrow::datatypes::{DataType, Float64Type, Int64Type, TimeUnit, TimestampNanosecondType};
use arrow_schema::Schema;

use crate::error::IngestError;
use crate::staging::{ColumnValues, WriterData};
use crate::types::{ColumnInfo, ColumnType, TableSchema, Timespec};

/// Derives a table schema from an Arrow schema, skipping the index column.
pub fn schema_from_arrow(
    table_name: &str,
    arrow_schema: &Schema,
    timestamp_column: &str,
) -> Result<TableSchema, IngestError> {
    let columns = arrow_schema
        .fields()
        .iter()
        .filter(|field| field.name() != timestamp_column)
        .map(|field| {
            Ok(ColumnInfo::new(
                field.name().clone(),
                ColumnType::from_arrow_type(field.data_type())?,
            ))
        })
        .collect::<Result<Vec<_>, IngestError>>()?;
    Ok(TableSchema::new(table_name, columns))
}

/// DATA MARSHALLING
/// Appends the rows of an Arrow `RecordBatch` to `data` for the table `schema`.
///
/// The index is read from `timestamp_column`, which must be a non-null
/// `Timestamp(Nanosecond)` or `Int64` (nanoseconds since the epoch) column. Every
/// schema column is looked up by name; Arrow nulls become null cells.
pub fn append_record_batch(
    data: &mut WriterData,
    schema: &TableSchema,
    batch: &RecordBatch,
    timestamp_column: &str,
) -> Result<(), IngestError> {
    let index_array = batch.column_by_name(timestamp_column).ok_or_else(|| {
        IngestError::InvalidArgument(format!(
            "index column '{}' not found in record batch",
            timestamp_column
        ))
    })?;
    let index = arrow_to_index(index_array)?;

    let columns = schema
        .columns
        .iter()
        .map(|info| {
            let array = batch.column_by_name(&info.name).ok_or_else(|| {
                IngestError::InvalidArgument(format!(
                    "column '{}' of table '{}' not found in record batch",
                    info.name, schema.name
                ))
            })?;
            arrow_to_column_values(array).map(Some)
        })
        .collect::<Result<Vec<_>, IngestError>>()?;

    log::debug!(
        "staging {} rows from a record batch into '{}'",
        batch.num_rows(),
        schema.name
    );
    data.append(schema, index, columns)
}

fn arrow_to_index(array: &ArrayRef) -> Result<Vec<Timespec>, IngestError> {
    if array.null_count() > 0 {
        return Err(IngestError::InvalidArgument(
            "the index column must not contain nulls".to_string(),
        ));
    }

    let nanos: Vec<i64> = match array.data_type() {
        DataType::Timestamp(TimeUnit::Nanosecond, _) => array
            .as_primitive_opt::<TimestampNanosecondType>()
            .map(|a| a.values().to_vec()),
        DataType::Int64 => array
            .as_primitive_opt::<Int64Type>()
            .map(|a| a.values().to_vec()),
        dt => {
            return Err(IngestError::IncompatibleType(format!(
                "index column must be Timestamp(Nanosecond) or Int64, got {}",
                dt
            )))
        }
    }
    .ok_or_else(|| IngestError::InternalError("index array downcast failed".to_string()))?;

    Ok(nanos.into_iter().map(Timespec::from_nanos).collect())
}

/// Converts one Arrow array into caller-side column values, preserving nulls.
pub fn arrow_to_column_values(array: &dyn Array) -> Result<ColumnValues, IngestError> {
    let downcast_failed =
        || IngestError::InternalError(format!("downcast of {} array failed", array.data_type()));

    let values = match array.data_type() {
        DataType::Int64 => ColumnValues::Int64(
            array
                .as_primitive_opt::<Int64Type>()
                .ok_or_else(downcast_failed)?
                .iter()
                .collect(),
        ),
        DataType::Float64 => ColumnValues::Double(
            array
                .as_primitive_opt::<Float64Type>()
                .ok_or_else(downcast_failed)?
                .iter()
                .collect(),
        ),
        DataType::Timestamp(TimeUnit::Nanosecond, _) => ColumnValues::Timestamp(
            array
                .as_primitive_opt::<TimestampNanosecondType>()
                .ok_or_else(downcast_failed)?
                .iter()
                .map(|cell| cell.map(Timespec::from_nanos))
                .collect(),
        ),
        DataType::Binary => ColumnValues::Blob(
            array
                .as_binary_opt::<i32>()
                .ok_or_else(downcast_failed)?
                .iter()
                .map(|cell| cell.map(<[u8]>::to_vec))
                .collect(),
        ),
        DataType::LargeBinary => ColumnValues::Blob(
            array
                .as_binary_opt::<i64>()
                .ok_or_else(downcast_failed)?
                .iter()
                .map(|cell| cell.map(<[u8]>::to_vec))
                .collect(),
        ),
        DataType::Utf8 => ColumnValues::String(
            array
                .as_string_opt::<i32>()
                .ok_or_else(downcast_failed)?
                .iter()
                .map(|cell| cell.map(str::to_string))
                .collect(),
        ),
        DataType::LargeUtf8 => ColumnValues::String(
            array
                .as_string_opt::<i64>()
                .ok_or_else(downcast_failed)?
                .iter()
                .map(|cell| cell.map(str::to_string))
                .collect(),
        ),
        dt => {
            return Err(IngestError::IncompatibleType(format!(
                "Unsupported Arrow type: {}",
                dt
            )))
        }
    };
    Ok(values)
}
