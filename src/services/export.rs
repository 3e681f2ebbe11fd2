//! 数据表 CSV 导出

use sea_orm::{EntityTrait, IdenStatic, Iterable};
use serde_json::Value;
use tracing::{debug, error};

use crate::entity::prelude::*;
use crate::errors::{ClinicError, Result};
use crate::models::common::TableKind;
use crate::storage::Storage;

/// 实体的列名（升序）
fn entity_columns<E: EntityTrait>() -> Vec<String> {
    let mut columns: Vec<String> = E::Column::iter().map(|c| c.as_str().to_string()).collect();
    columns.sort();
    columns
}

fn table_columns(kind: TableKind) -> Vec<String> {
    match kind {
        TableKind::User => entity_columns::<Users>(),
        TableKind::Model => entity_columns::<AiModels>(),
        TableKind::Teacher => entity_columns::<Teachers>(),
        TableKind::Category => entity_columns::<Categories>(),
        TableKind::Case => entity_columns::<Cases>(),
    }
}

/// JSON 值转为单元格文本，空值为空单元格
fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// 导出整张表为 CSV
///
/// 首行为升序排列的列名，其后每条记录一行。
pub async fn export_table_csv(storage: &dyn Storage, kind: TableKind) -> Result<Vec<u8>> {
    let rows = storage.export_table(kind).await?;
    let columns = table_columns(kind);

    let mut wtr = csv::Writer::from_writer(vec![]);

    // 写入表头
    wtr.write_record(&columns)?;

    // 写入数据
    for row in &rows {
        wtr.write_record(columns.iter().map(|col| cell(row.get(col))))?;
    }

    let data = wtr.into_inner().map_err(|e| {
        error!("CSV 生成失败: {}", e);
        ClinicError::serialization(format!("CSV 生成失败: {e}"))
    })?;

    debug!("导出数据表 {}，共 {} 行", kind, rows.len());
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cases::requests::CreateCaseRequest;
    use crate::storage::sea_orm_storage::memory_storage;

    #[tokio::test]
    async fn test_export_header_is_sorted_and_nulls_are_empty() {
        let storage = memory_storage().await;
        storage
            .create_case(CreateCaseRequest {
                creator: Some("alice".into()),
                content: Some("line one, with comma".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        let bytes = export_table_csv(&storage, TableKind::Case).await.unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());

        let header: Vec<String> = reader
            .headers()
            .unwrap()
            .iter()
            .map(String::from)
            .collect();
        assert_eq!(
            header,
            vec!["chapter_id", "content", "creator", "id", "profile", "teacher_id"]
        );

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(&record[0], "");
        assert_eq!(&record[1], "line one, with comma");
        assert_eq!(&record[2], "alice");
        assert_eq!(&record[3], "1");
        assert_eq!(&record[5], "");
    }

    #[tokio::test]
    async fn test_export_empty_table_has_header_only() {
        let storage = memory_storage().await;
        let bytes = export_table_csv(&storage, TableKind::Model).await.unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].split(',').any(|c| c == "use"));
    }
}
