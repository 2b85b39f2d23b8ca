//! Hardware report data model and the monitor collaborator seam.
//!
//! The report is a JSON array of hardware nodes with PascalCase keys and
//! integer enum discriminants; existing hosts deserialize exactly this shape.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::MonitorError;

/// Hardware categories, serialized as integer discriminants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareType {
    Motherboard,
    SuperIO,
    Cpu,
    Memory,
    GpuNvidia,
    GpuAmd,
    GpuIntel,
    Storage,
    Network,
    Cooler,
    EmbeddedController,
    Psu,
    Battery,
}

impl HardwareType {
    fn discriminant(self) -> i32 {
        match self {
            Self::Motherboard => 0,
            Self::SuperIO => 1,
            Self::Cpu => 2,
            Self::Memory => 3,
            Self::GpuNvidia => 4,
            Self::GpuAmd => 5,
            Self::GpuIntel => 6,
            Self::Storage => 7,
            Self::Network => 8,
            Self::Cooler => 9,
            Self::EmbeddedController => 10,
            Self::Psu => 11,
            Self::Battery => 12,
        }
    }
}

impl Serialize for HardwareType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i32(self.discriminant())
    }
}

/// Sensor categories, serialized as integer discriminants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorType {
    Voltage,
    // V
    Current,
    // A
    Power,
    // W
    Clock,
    // MHz
    Temperature,
    // °C
    Load,
    // %
    Frequency,
    // Hz
    Fan,
    // RPM
    Flow,
    // L/h
    Control,
    // %
    Level,
    // %
    Factor,
    // 1
    Data,
    // GB = 2^30 Bytes
    SmallData,
    // MB = 2^20 Bytes
    Throughput,
    // B/s
    TimeSpan,
    // Seconds
    Energy,
    // milliwatt-hour (mWh)
    Noise, // dBA
}

impl SensorType {
    fn discriminant(self) -> i32 {
        match self {
            Self::Voltage => 0,
            Self::Current => 1,
            Self::Power => 2,
            Self::Clock => 3,
            Self::Temperature => 4,
            Self::Load => 5,
            Self::Frequency => 6,
            Self::Fan => 7,
            Self::Flow => 8,
            Self::Control => 9,
            Self::Level => 10,
            Self::Factor => 11,
            Self::Data => 12,
            Self::SmallData => 13,
            Self::Throughput => 14,
            Self::TimeSpan => 15,
            Self::Energy => 16,
            Self::Noise => 17,
        }
    }
}

impl Serialize for SensorType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i32(self.discriminant())
    }
}

/// A single sensor reading with its running min/max.
#[derive(Debug, Clone)]
pub struct Sensor {
    pub sensor_type: SensorType,
    pub name: String,
    pub index: i32,
    pub value: f32,
    pub min: f32,
    pub max: f32,
}

impl Sensor {
    pub fn new(sensor_type: SensorType, name: impl Into<String>, index: i32, value: f32) -> Self {
        Self {
            sensor_type,
            name: name.into(),
            index,
            value,
            min: value,
            max: value,
        }
    }

    /// Records a new reading, widening the min/max envelope.
    pub fn record(&mut self, value: f32) {
        self.value = value;
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }
}

impl Serialize for Sensor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_struct("Sensor", 6)?;
        s.serialize_field("SensorType", &self.sensor_type)?;
        s.serialize_field("Name", &self.name)?;
        s.serialize_field("Index", &self.index)?;
        s.serialize_field("Value", &self.value)?;
        s.serialize_field("Min", &self.min)?;
        s.serialize_field("Max", &self.max)?;
        s.end()
    }
}

/// A hardware node: a device with its sensors and nested sub-hardware.
#[derive(Debug, Clone)]
pub struct Hardware {
    pub hardware_type: HardwareType,
    pub name: String,
    pub sub_hardware: Vec<Hardware>,
    pub sensors: Vec<Sensor>,
}

impl Hardware {
    pub fn new(hardware_type: HardwareType, name: impl Into<String>) -> Self {
        Self {
            hardware_type,
            name: name.into(),
            sub_hardware: Vec::new(),
            sensors: Vec::new(),
        }
    }

    /// Total sensor count including nested sub-hardware.
    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
            + self
                .sub_hardware
                .iter()
                .map(Hardware::sensor_count)
                .sum::<usize>()
    }
}

impl Serialize for Hardware {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_struct("Hardware", 4)?;
        s.serialize_field("HardwareType", &self.hardware_type)?;
        s.serialize_field("Name", &self.name)?;
        s.serialize_field("SubHardware", &self.sub_hardware)?;
        s.serialize_field("Sensors", &self.sensors)?;
        s.end()
    }
}

/// Hardware sections a monitor probes.
///
/// Defaults match the sections the monitor has always enabled: CPU, memory,
/// storage, network, and temperature sensors on; motherboard-class probing off.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    pub cpu: bool,
    pub memory: bool,
    pub storage: bool,
    pub network: bool,
    pub temperatures: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            cpu: true,
            memory: true,
            storage: true,
            network: true,
            temperatures: true,
        }
    }
}

impl MonitorConfig {
    /// Parses a JSON configuration document. Unknown keys are rejected so a
    /// typo'd section name fails loudly instead of silently probing nothing.
    pub fn from_json(json: &str) -> Result<Self, MonitorError> {
        serde_json::from_str(json).map_err(|e| MonitorError::Config(e.to_string()))
    }
}

/// The boundary's only contract with a monitor collaborator.
///
/// Implementations own whatever internal device state they need; the handle
/// manager never inspects it, it only forwards these two calls.
pub trait MonitorSource: Send {
    /// Re-reads current sensor values in place.
    fn refresh(&mut self) -> Result<(), MonitorError>;

    /// Serializes the current hardware tree as the JSON report.
    fn report(&self) -> Result<String, MonitorError>;

    /// Total number of sensors currently tracked.
    fn sensor_count(&self) -> usize;
}

/// Serializes a hardware tree in the report wire format.
pub fn report_json(hardware: &[Hardware]) -> Result<String, MonitorError> {
    Ok(serde_json::to_string(hardware)?)
}
