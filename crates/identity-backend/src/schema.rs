//! Declares the identity model's schema into a partial configuration.

use tracing::debug;
use crate::config::{AutoCompleteConfig, TensorSpec, DECOUPLED_PARAMETER, TRUE_VALUE};
use crate::error::Result;
use crate::tensor::constant::{DYNAMIC_DIM, INPUT_TOKEN, OUTPUT_PARAMETERS, OUTPUT_PARAMETERS_DIMS, OUTPUT_TOKEN};
use crate::tensor::DataType;

/// Completes `config` with one optional `{type}_input` and one
/// `{type}_output` per supported data type, the `output_parameters` output,
/// host batching disabled, and the decoupled policy when the `decoupled`
/// parameter is `"True"`.
///
/// Running it again on its own output changes nothing.
pub fn negotiate(config: &mut AutoCompleteConfig) -> Result<()> {
    let data_types = config.supported_data_types().to_vec();
    let dims = vec![DYNAMIC_DIM, DYNAMIC_DIM];

    for data_type in &data_types {
        let type_name = data_type.type_name();
        config.add_input(
            TensorSpec::new(format!("{type_name}_{INPUT_TOKEN}"), *data_type, dims.clone()).with_optional(true),
        )?;
    }
    for data_type in &data_types {
        let type_name = data_type.type_name();
        config.add_output(TensorSpec::new(format!("{type_name}_{OUTPUT_TOKEN}"), *data_type, dims.clone()))?;
    }
    config.add_output(TensorSpec::new(
        OUTPUT_PARAMETERS,
        DataType::Bytes,
        OUTPUT_PARAMETERS_DIMS.to_vec(),
    ))?;

    config.set_max_batch_size(0);

    let decoupled = config.config().parameter(DECOUPLED_PARAMETER) == Some(TRUE_VALUE);
    if decoupled {
        config.set_decoupled(true)?;
    }

    debug!(
        model = %config.config().name,
        data_types = data_types.len(),
        decoupled,
        "completed model configuration"
    );
    Ok(())
}
