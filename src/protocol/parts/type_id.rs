use crate::{hdb_error::usage_err, HdbResult};

/// ID of the value type of a database column or a parameter.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TypeId {
    /// For database type TINYINT; used with [`HdbValue::TINYINT`](crate::HdbValue::TINYINT).
    TINYINT = 1,
    /// For database type SMALLINT; used with [`HdbValue::SMALLINT`](crate::HdbValue::SMALLINT).
    SMALLINT = 2,
    /// For database type INT; used with [`HdbValue::INT`](crate::HdbValue::INT).
    INT = 3,
    /// For database type BIGINT; used with [`HdbValue::BIGINT`](crate::HdbValue::BIGINT).
    BIGINT = 4,
    /// For database types DECIMAL and SMALLDECIMAL;
    /// used with [`HdbValue::DECIMAL`](crate::HdbValue::DECIMAL).
    DECIMAL = 5,
    /// For database type REAL; used with [`HdbValue::REAL`](crate::HdbValue::REAL).
    REAL = 6,
    /// For database type DOUBLE; used with [`HdbValue::DOUBLE`](crate::HdbValue::DOUBLE).
    DOUBLE = 7,
    /// For database type CHAR; used with [`HdbValue::STRING`](crate::HdbValue::STRING).
    CHAR = 8,
    /// For database type VARCHAR; used with [`HdbValue::STRING`](crate::HdbValue::STRING).
    VARCHAR = 9,
    /// For database type NCHAR; used with [`HdbValue::STRING`](crate::HdbValue::STRING).
    NCHAR = 10,
    /// For database type NVARCHAR; used with [`HdbValue::STRING`](crate::HdbValue::STRING).
    NVARCHAR = 11,
    /// For database type BINARY; used with [`HdbValue::BINARY`](crate::HdbValue::BINARY).
    BINARY = 12,
    /// For database type VARBINARY; used with [`HdbValue::BINARY`](crate::HdbValue::BINARY).
    VARBINARY = 13,
    /// For database type DATE; used with [`HdbValue::DATE`](crate::HdbValue::DATE).
    DATE = 14,
    /// For database type TIME; used with [`HdbValue::TIME`](crate::HdbValue::TIME).
    TIME = 15,
    /// For database type TIMESTAMP; used with
    /// [`HdbValue::TIMESTAMP`](crate::HdbValue::TIMESTAMP).
    TIMESTAMP = 16,
    /// For database type BLOB; used with [`HdbValue::LOB`](crate::HdbValue::LOB).
    BLOB = 25,
    /// For database type CLOB; used with [`HdbValue::LOB`](crate::HdbValue::LOB).
    CLOB = 26,
    /// For database type NCLOB; used with [`HdbValue::LOB`](crate::HdbValue::LOB).
    NCLOB = 27,
    /// For database type BOOLEAN; used with [`HdbValue::BOOLEAN`](crate::HdbValue::BOOLEAN).
    BOOLEAN = 28,
    /// For database type ST_GEOMETRY. Not supported: the NULL convention of
    /// this type is not pinned down; values are rejected on both directions.
    ST_GEOMETRY = 29,
    /// For database type ST_POINT. Not supported, like ST_GEOMETRY.
    ST_POINT = 30,
    /// For database type TEXT; used with [`HdbValue::LOB`](crate::HdbValue::LOB).
    TEXT = 51,
    /// For database type BINTEXT. Not supported, like ST_GEOMETRY.
    BINTEXT = 52,
}

impl TypeId {
    pub(crate) fn try_new(id: u8) -> HdbResult<Self> {
        Ok(match id {
            1 => Self::TINYINT,
            2 => Self::SMALLINT,
            3 => Self::INT,
            4 => Self::BIGINT,
            5 => Self::DECIMAL,
            6 => Self::REAL,
            7 => Self::DOUBLE,
            8 => Self::CHAR,
            9 => Self::VARCHAR,
            10 => Self::NCHAR,
            11 => Self::NVARCHAR,
            12 => Self::BINARY,
            13 => Self::VARBINARY,
            14 => Self::DATE,
            15 => Self::TIME,
            16 => Self::TIMESTAMP,
            // 17 - 24: reserved, do not use
            25 => Self::BLOB,
            26 => Self::CLOB,
            27 => Self::NCLOB,
            28 => Self::BOOLEAN,
            29 => Self::ST_GEOMETRY,
            30 => Self::ST_POINT,
            51 => Self::TEXT,
            52 => Self::BINTEXT,
            tc => return Err(usage_err!("Unsupported type code {tc}")),
        })
    }

    // The wire uses ids < 128 for non-null values, and ids > 128 to signal
    // a NULL value of the type.
    pub(crate) fn type_code(self, is_null: bool) -> u8 {
        (if is_null { 128 } else { 0 }) + self as u8
    }

    // Returns true for the types that transfer by locator + chunked reads.
    pub(crate) fn is_lob(self) -> bool {
        matches!(self, Self::BLOB | Self::CLOB | Self::NCLOB | Self::TEXT)
    }

    // Types whose NULL convention is not pinned down by a recorded trace.
    pub(crate) fn is_unsupported(self) -> bool {
        matches!(self, Self::ST_GEOMETRY | Self::ST_POINT | Self::BINTEXT)
    }

    pub(crate) fn matches_value_type(self, value_type: Self) -> HdbResult<()> {
        if value_type == self {
            return Ok(());
        }
        // From-To conversions the server accepts
        match (value_type, self) {
            (Self::BOOLEAN, Self::TINYINT | Self::SMALLINT | Self::INT | Self::BIGINT)
            | (
                Self::CHAR | Self::VARCHAR | Self::NCHAR | Self::NVARCHAR,
                Self::CHAR
                | Self::VARCHAR
                | Self::NCHAR
                | Self::NVARCHAR
                | Self::CLOB
                | Self::NCLOB
                | Self::TEXT,
            )
            | (Self::BINARY | Self::VARBINARY, Self::BINARY | Self::VARBINARY | Self::BLOB)
            | (
                Self::TINYINT | Self::SMALLINT | Self::INT,
                Self::SMALLINT | Self::INT | Self::BIGINT,
            ) => Ok(()),
            _ => Err(usage_err!(
                "value type id {value_type:?} does not match metadata {self:?}",
            )),
        }
    }
}

impl std::fmt::Display for TypeId {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            fmt,
            "{}",
            match self {
                Self::TINYINT => "TINYINT",
                Self::SMALLINT => "SMALLINT",
                Self::INT => "INT",
                Self::BIGINT => "BIGINT",
                Self::DECIMAL => "DECIMAL",
                Self::REAL => "REAL",
                Self::DOUBLE => "DOUBLE",
                Self::CHAR => "CHAR",
                Self::VARCHAR => "VARCHAR",
                Self::NCHAR => "NCHAR",
                Self::NVARCHAR => "NVARCHAR",
                Self::BINARY => "BINARY",
                Self::VARBINARY => "VARBINARY",
                Self::DATE => "DATE",
                Self::TIME => "TIME",
                Self::TIMESTAMP => "TIMESTAMP",
                Self::BLOB => "BLOB",
                Self::CLOB => "CLOB",
                Self::NCLOB => "NCLOB",
                Self::BOOLEAN => "BOOLEAN",
                Self::ST_GEOMETRY => "ST_GEOMETRY",
                Self::ST_POINT => "ST_POINT",
                Self::TEXT => "TEXT",
                Self::BINTEXT => "BINTEXT",
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::TypeId;

    #[test]
    fn type_codes() {
        assert_eq!(TypeId::try_new(14).unwrap(), TypeId::DATE);
        assert_eq!(TypeId::try_new(25).unwrap(), TypeId::BLOB);
        assert_eq!(TypeId::try_new(51).unwrap(), TypeId::TEXT);
        assert!(TypeId::try_new(99).is_err());
        assert_eq!(TypeId::NVARCHAR.type_code(false), 11);
        assert_eq!(TypeId::NVARCHAR.type_code(true), 139);
    }

    #[test]
    fn unsupported_types() {
        assert!(TypeId::ST_GEOMETRY.is_unsupported());
        assert!(TypeId::BINTEXT.is_unsupported());
        assert!(!TypeId::NCLOB.is_unsupported());
    }
}
