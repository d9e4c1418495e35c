use crate::models::query::QueryParameters;
use crate::models::responses::{Record, ResultEnvelope};

pub fn shape(records: Vec<Record>, params: &QueryParameters) -> ResultEnvelope {
    ResultEnvelope {
        total_count: records.len(),
        data: records,
        offset: params.offset,
        limit: params.limit,
    }
}
