//! pandapower JSON writer.
//!
//! pandapower stores a net as a `pandapowerNet` object whose element tables
//! are pandas DataFrames serialized in split orientation (`columns`, `index`,
//! `data`) and embedded as JSON strings. This is the shape read back by
//! `pandapower.from_json_string`.

use std::io::Write;

use anyhow::{Context, Result};
use serde_json::{json, Map, Value};

use super::net::{BusRow, ExtGridRow, LineRow, LoadRow, PandapowerNet, TrafoRow};

/// pandapower release whose file format is written.
pub const PANDAPOWER_FORMAT_VERSION: &str = "2.13.1";

/// One element table: column names with their pandas dtypes, and row values
/// in column order.
trait Table {
    const COLUMNS: &'static [(&'static str, &'static str)];

    fn index(&self) -> usize;

    fn values(&self) -> Vec<Value>;
}

impl Table for BusRow {
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("name", "object"),
        ("vn_kv", "float64"),
        ("type", "object"),
        ("zone", "object"),
        ("in_service", "bool"),
    ];

    fn index(&self) -> usize {
        self.index
    }

    fn values(&self) -> Vec<Value> {
        vec![
            json!(self.name),
            json!(self.vn_kv),
            json!(self.bus_type),
            json!(self.zone),
            json!(self.in_service),
        ]
    }
}

impl Table for LineRow {
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("name", "object"),
        ("std_type", "object"),
        ("from_bus", "uint32"),
        ("to_bus", "uint32"),
        ("length_km", "float64"),
        ("r_ohm_per_km", "float64"),
        ("x_ohm_per_km", "float64"),
        ("c_nf_per_km", "float64"),
        ("g_us_per_km", "float64"),
        ("max_i_ka", "float64"),
        ("df", "float64"),
        ("parallel", "uint32"),
        ("type", "object"),
        ("in_service", "bool"),
    ];

    fn index(&self) -> usize {
        self.index
    }

    fn values(&self) -> Vec<Value> {
        vec![
            json!(self.name),
            json!(self.std_type),
            json!(self.from_bus),
            json!(self.to_bus),
            json!(self.length_km),
            json!(self.r_ohm_per_km),
            json!(self.x_ohm_per_km),
            json!(self.c_nf_per_km),
            json!(self.g_us_per_km),
            json!(self.max_i_ka),
            json!(self.df),
            json!(self.parallel),
            json!(self.line_type),
            json!(self.in_service),
        ]
    }
}

impl Table for TrafoRow {
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("name", "object"),
        ("std_type", "object"),
        ("hv_bus", "uint32"),
        ("lv_bus", "uint32"),
        ("sn_mva", "float64"),
        ("vn_hv_kv", "float64"),
        ("vn_lv_kv", "float64"),
        ("vk_percent", "float64"),
        ("vkr_percent", "float64"),
        ("pfe_kw", "float64"),
        ("i0_percent", "float64"),
        ("shift_degree", "float64"),
        ("parallel", "uint32"),
        ("df", "float64"),
        ("in_service", "bool"),
    ];

    fn index(&self) -> usize {
        self.index
    }

    fn values(&self) -> Vec<Value> {
        vec![
            json!(self.name),
            json!(self.std_type),
            json!(self.hv_bus),
            json!(self.lv_bus),
            json!(self.sn_mva),
            json!(self.vn_hv_kv),
            json!(self.vn_lv_kv),
            json!(self.vk_percent),
            json!(self.vkr_percent),
            json!(self.pfe_kw),
            json!(self.i0_percent),
            json!(self.shift_degree),
            json!(self.parallel),
            json!(self.df),
            json!(self.in_service),
        ]
    }
}

impl Table for ExtGridRow {
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("name", "object"),
        ("bus", "uint32"),
        ("vm_pu", "float64"),
        ("va_degree", "float64"),
        ("in_service", "bool"),
    ];

    fn index(&self) -> usize {
        self.index
    }

    fn values(&self) -> Vec<Value> {
        vec![
            json!(self.name),
            json!(self.bus),
            json!(self.vm_pu),
            json!(self.va_degree),
            json!(self.in_service),
        ]
    }
}

impl Table for LoadRow {
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("name", "object"),
        ("bus", "uint32"),
        ("p_mw", "float64"),
        ("q_mvar", "float64"),
        ("scaling", "float64"),
        ("in_service", "bool"),
    ];

    fn index(&self) -> usize {
        self.index
    }

    fn values(&self) -> Vec<Value> {
        vec![
            json!(self.name),
            json!(self.bus),
            json!(self.p_mw),
            json!(self.q_mvar),
            json!(self.scaling),
            json!(self.in_service),
        ]
    }
}

fn data_frame<T: Table>(rows: &[T]) -> Result<Value> {
    let columns: Vec<&str> = T::COLUMNS.iter().map(|(name, _)| *name).collect();
    let index: Vec<usize> = rows.iter().map(Table::index).collect();
    let data: Vec<Vec<Value>> = rows.iter().map(Table::values).collect();
    let content = serde_json::to_string(&json!({
        "columns": columns,
        "index": index,
        "data": data,
    }))
    .context("serializing DataFrame content")?;

    let dtype: Map<String, Value> = T::COLUMNS
        .iter()
        .map(|(name, dtype)| (name.to_string(), json!(dtype)))
        .collect();

    Ok(json!({
        "_module": "pandas.core.frame",
        "_class": "DataFrame",
        "_object": content,
        "orient": "split",
        "dtype": dtype,
        "is_multiindex": false,
        "is_multicolumn": false,
    }))
}

impl PandapowerNet {
    /// The net as a pandapower JSON value.
    pub fn to_json_value(&self) -> Result<Value> {
        let mut std_types =
            serde_json::to_value(&self.std_types).context("serializing standard types")?;
        if let Value::Object(map) = &mut std_types {
            map.insert("trafo3w".to_string(), json!({}));
        }

        Ok(json!({
            "_module": "pandapower.auxiliary",
            "_class": "pandapowerNet",
            "_object": {
                "name": self.name,
                "f_hz": self.f_hz,
                "sn_mva": self.sn_mva,
                "version": PANDAPOWER_FORMAT_VERSION,
                "format_version": PANDAPOWER_FORMAT_VERSION,
                "bus": data_frame(&self.bus).context("bus table")?,
                "line": data_frame(&self.line).context("line table")?,
                "trafo": data_frame(&self.trafo).context("trafo table")?,
                "ext_grid": data_frame(&self.ext_grid).context("ext_grid table")?,
                "load": data_frame(&self.load).context("load table")?,
                "std_types": std_types,
            },
        }))
    }

    /// The net as a pandapower JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.to_json_value()?).context("serializing pandapower net")
    }

    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, &self.to_json_value()?)
            .context("writing pandapower net")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mgrid_core::StdTypes;

    fn net() -> PandapowerNet {
        PandapowerNet {
            name: "test".into(),
            f_hz: 50.0,
            sn_mva: 1.0,
            bus: vec![
                BusRow {
                    index: 0,
                    name: "a1".into(),
                    vn_kv: 20.0,
                    bus_type: "b".into(),
                    zone: "layer0".into(),
                    in_service: true,
                },
                BusRow {
                    index: 1,
                    name: "a2".into(),
                    vn_kv: 20.0,
                    bus_type: "b".into(),
                    zone: "layer0".into(),
                    in_service: true,
                },
            ],
            line: vec![],
            trafo: vec![],
            ext_grid: vec![ExtGridRow {
                index: 0,
                name: "slack".into(),
                bus: 1,
                vm_pu: 1.0,
                va_degree: 0.0,
                in_service: true,
            }],
            load: vec![],
            std_types: StdTypes::new(),
        }
    }

    #[test]
    fn test_data_frame_split_orientation() {
        let value = net().to_json_value().unwrap();
        assert_eq!(value["_class"], "pandapowerNet");

        let bus = &value["_object"]["bus"];
        assert_eq!(bus["_class"], "DataFrame");
        assert_eq!(bus["orient"], "split");
        assert_eq!(bus["dtype"]["vn_kv"], "float64");

        let content: Value = serde_json::from_str(bus["_object"].as_str().unwrap()).unwrap();
        assert_eq!(content["columns"][1], "vn_kv");
        assert_eq!(content["index"], json!([0, 1]));
        assert_eq!(content["data"][1][0], "a2");
    }

    #[test]
    fn test_empty_tables_keep_columns() {
        let value = net().to_json_value().unwrap();
        let line = &value["_object"]["line"];
        let content: Value = serde_json::from_str(line["_object"].as_str().unwrap()).unwrap();
        assert_eq!(content["columns"].as_array().unwrap().len(), LineRow::COLUMNS.len());
        assert!(content["data"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_std_types_block() {
        let value = net().to_json_value().unwrap();
        let std_types = &value["_object"]["std_types"];
        assert!(std_types["line"].is_object());
        assert!(std_types["trafo"].is_object());
        assert!(std_types["trafo3w"].is_object());
    }

    #[test]
    fn test_write_json() {
        let mut buffer = Vec::new();
        net().write_json(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("pandapower.auxiliary"));
    }
}
