//! 表与字段的强类型名称

use serde::{Deserialize, Serialize};

/// 数据表种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    User,
    Model,
    Teacher,
    Category,
    Case,
}

impl TableKind {
    pub fn all() -> &'static [TableKind] {
        &[
            TableKind::User,
            TableKind::Model,
            TableKind::Teacher,
            TableKind::Category,
            TableKind::Case,
        ]
    }

    /// 数据库中的表名
    pub fn table_name(&self) -> &'static str {
        match self {
            TableKind::User => "user",
            TableKind::Model => "model",
            TableKind::Teacher => "teacher",
            TableKind::Category => "category",
            TableKind::Case => "case",
        }
    }
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table_name())
    }
}

impl std::str::FromStr for TableKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TableKind::all()
            .iter()
            .copied()
            .find(|kind| kind.table_name() == s)
            .ok_or_else(|| format!("Invalid table name: {s}"))
    }
}

/// 可用于生成下拉选项的文本字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistinctField {
    CategoryBook,
    CategoryChapter,
    CategorySubject,
    ModelPlatform,
    ModelSeries,
    ModelModule,
    TeacherModel,
    TeacherCreator,
}

impl DistinctField {
    /// 字段所属的表
    pub fn table(&self) -> TableKind {
        match self {
            DistinctField::CategoryBook
            | DistinctField::CategoryChapter
            | DistinctField::CategorySubject => TableKind::Category,
            DistinctField::ModelPlatform | DistinctField::ModelSeries | DistinctField::ModelModule => {
                TableKind::Model
            }
            DistinctField::TeacherModel | DistinctField::TeacherCreator => TableKind::Teacher,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_kind_parses_table_names() {
        assert_eq!("case".parse::<TableKind>(), Ok(TableKind::Case));
        assert_eq!("model".parse::<TableKind>(), Ok(TableKind::Model));
        assert!("cases".parse::<TableKind>().is_err());
    }

    #[test]
    fn test_distinct_field_table() {
        assert_eq!(DistinctField::CategoryChapter.table(), TableKind::Category);
        assert_eq!(DistinctField::ModelSeries.table(), TableKind::Model);
        assert_eq!(DistinctField::TeacherCreator.table(), TableKind::Teacher);
    }
}
