/// ACL operation codes as numbered by the Kafka protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum AclOperation {
    Unknown = 0,
    Any = 1,
    All = 2,
    Read = 3,
    Write = 4,
    Create = 5,
    Delete = 6,
    Alter = 7,
    Describe = 8,
    ClusterAction = 9,
    DescribeConfigs = 10,
    AlterConfigs = 11,
    IdempotentWrite = 12,
    CreateTokens = 13,
    DescribeTokens = 14,
}

impl AclOperation {
    pub fn code(self) -> i8 {
        self as i8
    }
}

impl From<i8> for AclOperation {
    fn from(value: i8) -> Self {
        match value {
            1 => AclOperation::Any,
            2 => AclOperation::All,
            3 => AclOperation::Read,
            4 => AclOperation::Write,
            5 => AclOperation::Create,
            6 => AclOperation::Delete,
            7 => AclOperation::Alter,
            8 => AclOperation::Describe,
            9 => AclOperation::ClusterAction,
            10 => AclOperation::DescribeConfigs,
            11 => AclOperation::AlterConfigs,
            12 => AclOperation::IdempotentWrite,
            13 => AclOperation::CreateTokens,
            14 => AclOperation::DescribeTokens,
            _ => AclOperation::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AclOperation;

    #[test]
    fn codes_survive_conversion() {
        for code in 0..=14i8 {
            assert_eq!(AclOperation::from(code).code(), code);
        }
    }

    #[test]
    fn unknown_codes_collapse_to_unknown() {
        assert_eq!(AclOperation::from(-1), AclOperation::Unknown);
        assert_eq!(AclOperation::from(42), AclOperation::Unknown);
    }
}
