/// One geocoded address, immutable after load.
///
/// The searchable fields (`number`, `street`, `unit`, `city`, `postcode`)
/// hold normalized UPPERCASE text once the data node has built its indexes;
/// the `original_*` fields preserve the raw CSV spelling for display.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressRecord {
    pub longitude: f64,
    pub latitude: f64,
    /// Unique record ID within a shard. The source CSV provides this as a
    /// hex string; it is converted back to hex only at the wire boundary.
    pub hash: u64,
    pub number: String,
    pub street: String,
    pub unit: String,
    pub city: String,
    pub postcode: String,
    pub original_street: String,
    pub original_unit: String,
    pub original_city: String,
}
