//! System-backed monitor implementation.
//!
//! Probes hardware through `sysinfo` and maintains the report tree across
//! refreshes so per-sensor min/max envelopes survive rebuilds.

use sysinfo::{Components, Disks, Networks, System};

use crate::error::MonitorError;
use crate::monitor::{
    Hardware, HardwareType, MonitorConfig, MonitorSource, Sensor, SensorType, report_json,
};

const GB: f64 = 1_000_000_000.0;

/// Default monitor: reads CPU, memory, storage, network, and temperature
/// sensors from the running system.
pub struct SystemMonitor {
    config: MonitorConfig,
    // Kept across refreshes; CPU usage needs consecutive samples.
    sys: System,
    tree: Vec<Hardware>,
}

impl SystemMonitor {
    /// Probes the system and builds the initial hardware tree. The report is
    /// valid immediately after construction, before any refresh.
    pub fn new(config: MonitorConfig) -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();

        let mut monitor = Self {
            config,
            sys,
            tree: Vec::new(),
        };
        monitor.tree = monitor.build_tree();
        monitor
    }

    fn build_tree(&self) -> Vec<Hardware> {
        let mut tree = Vec::new();

        if self.config.cpu {
            tree.push(self.cpu_node());
        }
        if self.config.memory {
            tree.push(self.memory_node());
        }
        if self.config.storage {
            storage_nodes(&mut tree);
        }
        if self.config.network {
            network_nodes(&mut tree);
        }

        tree
    }

    fn cpu_node(&self) -> Hardware {
        let brand = self
            .sys
            .cpus()
            .first()
            .map(|c| c.brand().trim().to_string())
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| "CPU".to_string());

        let mut cpu = Hardware::new(HardwareType::Cpu, brand);
        cpu.sensors.push(Sensor::new(
            SensorType::Load,
            "CPU Total",
            0,
            self.sys.global_cpu_usage(),
        ));

        for (i, core) in self.sys.cpus().iter().enumerate() {
            let index = i as i32;
            cpu.sensors.push(Sensor::new(
                SensorType::Load,
                format!("CPU Core #{}", i + 1),
                index + 1,
                core.cpu_usage(),
            ));
            cpu.sensors.push(Sensor::new(
                SensorType::Clock,
                format!("CPU Core #{}", i + 1),
                index,
                core.frequency() as f32,
            ));
        }

        if self.config.temperatures {
            let components = Components::new_with_refreshed_list();
            for (i, component) in components.iter().enumerate() {
                cpu.sensors.push(Sensor::new(
                    SensorType::Temperature,
                    component.label().to_string(),
                    i as i32,
                    component.temperature().unwrap_or(0.0),
                ));
            }
        }

        cpu
    }

    fn memory_node(&self) -> Hardware {
        let total = self.sys.total_memory() as f64;
        let used = self.sys.used_memory() as f64;
        let available = self.sys.available_memory() as f64;
        let load = if total > 0.0 {
            (used / total * 100.0) as f32
        } else {
            0.0
        };

        let mut memory = Hardware::new(HardwareType::Memory, "Memory");
        memory
            .sensors
            .push(Sensor::new(SensorType::Load, "Memory", 0, load));
        memory.sensors.push(Sensor::new(
            SensorType::Data,
            "Memory Used",
            0,
            (used / GB) as f32,
        ));
        memory.sensors.push(Sensor::new(
            SensorType::Data,
            "Memory Available",
            1,
            (available / GB) as f32,
        ));
        memory
    }

    /// Rebuilds the tree from fresh readings, carrying min/max envelopes over
    /// from the previous tree.
    fn rebuild(&mut self) {
        let mut next = self.build_tree();
        merge_envelopes(&self.tree, &mut next);
        self.tree = next;
    }
}

fn storage_nodes(tree: &mut Vec<Hardware>) {
    let disks = Disks::new_with_refreshed_list();
    for disk in disks.iter() {
        let name = disk.name().to_string_lossy();
        let label = if name.is_empty() {
            disk.mount_point().to_string_lossy().into_owned()
        } else {
            name.into_owned()
        };

        let total = disk.total_space() as f64;
        let available = disk.available_space() as f64;
        let used_pct = if total > 0.0 {
            ((total - available) / total * 100.0) as f32
        } else {
            0.0
        };

        let mut node = Hardware::new(HardwareType::Storage, label);
        node.sensors
            .push(Sensor::new(SensorType::Load, "Used Space", 0, used_pct));
        node.sensors.push(Sensor::new(
            SensorType::Data,
            "Available Space",
            0,
            (available / GB) as f32,
        ));
        tree.push(node);
    }
}

fn network_nodes(tree: &mut Vec<Hardware>) {
    let networks = Networks::new_with_refreshed_list();
    for (name, data) in networks.iter() {
        let mut node = Hardware::new(HardwareType::Network, name.clone());
        node.sensors.push(Sensor::new(
            SensorType::Data,
            "Data Downloaded",
            0,
            (data.total_received() as f64 / GB) as f32,
        ));
        node.sensors.push(Sensor::new(
            SensorType::Data,
            "Data Uploaded",
            1,
            (data.total_transmitted() as f64 / GB) as f32,
        ));
        node.sensors.push(Sensor::new(
            SensorType::Throughput,
            "Download Speed",
            0,
            data.received() as f32,
        ));
        node.sensors.push(Sensor::new(
            SensorType::Throughput,
            "Upload Speed",
            1,
            data.transmitted() as f32,
        ));
        tree.push(node);
    }
}

/// Copies min/max envelopes from a previous tree into a freshly built one,
/// matching on hardware name plus sensor identity.
fn merge_envelopes(old: &[Hardware], next: &mut [Hardware]) {
    for node in next.iter_mut() {
        let Some(prev) = old
            .iter()
            .find(|p| p.hardware_type == node.hardware_type && p.name == node.name)
        else {
            continue;
        };

        for sensor in node.sensors.iter_mut() {
            if let Some(prev_sensor) = prev.sensors.iter().find(|s| {
                s.sensor_type == sensor.sensor_type
                    && s.name == sensor.name
                    && s.index == sensor.index
            }) {
                let value = sensor.value;
                sensor.min = prev_sensor.min;
                sensor.max = prev_sensor.max;
                sensor.record(value);
            }
        }

        merge_envelopes(&prev.sub_hardware, &mut node.sub_hardware);
    }
}

impl MonitorSource for SystemMonitor {
    fn refresh(&mut self) -> Result<(), MonitorError> {
        self.sys.refresh_all();
        self.rebuild();
        Ok(())
    }

    fn report(&self) -> Result<String, MonitorError> {
        report_json(&self.tree)
    }

    fn sensor_count(&self) -> usize {
        self.tree.iter().map(Hardware::sensor_count).sum()
    }
}
