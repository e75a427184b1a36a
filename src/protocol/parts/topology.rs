use crate::protocol::parts::{
    multiline_option_part::MultilineOptionPart, option_part::OptionId, option_value::OptionValue,
};
use crate::HdbResult;

// The TOPOLOGY_INFORMATION part describes the hosts of a scale-out system.
// The core engine only consumes and retains it; acting on it (failover,
// routing) is left to collaborators.
#[derive(Clone, Debug, Default)]
pub(crate) struct Topology(MultilineOptionPart<TopologyAttrId>);

impl Topology {
    pub(crate) fn parse(no_of_hosts: usize, rdr: &mut dyn std::io::Read) -> HdbResult<Self> {
        Ok(Self(MultilineOptionPart::parse(no_of_hosts, rdr)?))
    }

    pub(crate) fn host_count(&self) -> usize {
        self.0.len()
    }

    // (host, port) pairs in server order, where present.
    pub(crate) fn hosts(&self) -> Vec<(String, u16)> {
        self.0
            .lines()
            .iter()
            .filter_map(|line| {
                match (
                    line.get_opt(&TopologyAttrId::HostName),
                    line.get_opt(&TopologyAttrId::HostPortNumber),
                ) {
                    (Some(OptionValue::STRING(host)), Some(OptionValue::INT(port))) => {
                        u16::try_from(*port).ok().map(|port| (host.clone(), port))
                    }
                    _ => None,
                }
            })
            .collect()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) enum TopologyAttrId {
    HostName,         //  1 // host name
    HostPortNumber,   //  2 // port number
    TenantName,       //  3 // tenant name
    LoadFactor,       //  4 // load factor
    VolumeID,         //  5 // volume id
    IsMaster,         //  6 // master node in the system
    IsCurrentSession, //  7 // marks this session's node
    ServiceType,      //  8 // this node's service type
    IsStandby,        // 10 // standby node
    SiteType,         // 13 // site type
    Port,             // 15 // textual port
    __Unexpected__(u8),
}
impl OptionId<TopologyAttrId> for TopologyAttrId {
    fn to_u8(&self) -> u8 {
        match *self {
            Self::HostName => 1,
            Self::HostPortNumber => 2,
            Self::TenantName => 3,
            Self::LoadFactor => 4,
            Self::VolumeID => 5,
            Self::IsMaster => 6,
            Self::IsCurrentSession => 7,
            Self::ServiceType => 8,
            Self::IsStandby => 10,
            Self::SiteType => 13,
            Self::Port => 15,
            Self::__Unexpected__(val) => val,
        }
    }

    fn from_u8(val: u8) -> Self {
        match val {
            1 => Self::HostName,
            2 => Self::HostPortNumber,
            3 => Self::TenantName,
            4 => Self::LoadFactor,
            5 => Self::VolumeID,
            6 => Self::IsMaster,
            7 => Self::IsCurrentSession,
            8 => Self::ServiceType,
            10 => Self::IsStandby,
            13 => Self::SiteType,
            15 => Self::Port,
            val => {
                warn!("Unsupported value for TopologyAttrId received: {}", val);
                Self::__Unexpected__(val)
            }
        }
    }
}
