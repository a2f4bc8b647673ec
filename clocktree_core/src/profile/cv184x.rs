// Copyright 2026 the Clocktree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CV184x clock tree.
//!
//! ```text
//!   clk_osc (25 MHz)
//!   ├── clk_fpll ×40 ─┬── clk_fab_100m /10 ── bus clocks
//!   │                 ├── clk_hsperi /4 ──── high-speed peripherals
//!   │                 ├── clk_spi_nand /4 ── flash controller
//!   │                 └── uart, i2c, spi, sd, eth, ...
//!   ├── clk_mipimpll ×36 ─┬── clk_a0pll ×8 /7.32421875 ── audio
//!   │                     ├── clk_cam0pll ×66 /50
//!   │                     ├── clk_cam1pll ×64 /36
//!   │                     ├── clk_disppll ×33 /25 ── clk_sys_disp
//!   │                     └── clk_raw_axi /3 ── ISP
//!   ├── clk_mpll ×48, clk_tpll ×60, clk_appll ×40, clk_rvpll ×48
//!   └── clk_1m /25 ── timers
//!   clk_rtc (32.768 kHz)
//! ```

use crate::divider::Divider;
use crate::error::TopologyError;
use crate::preset::{Preset, PresetMode, PresetTable};
use crate::topology::{NodeSpec, Topology};
use crate::tree::ClockTree;

/// Crystal oscillator frequency in MHz.
pub const OSC_MHZ: f64 = 25.0;

/// Real-time clock crystal frequency in MHz.
pub const RTC_MHZ: f64 = 0.032_768;

/// Name of the reset-to-defaults preset.
pub const DEFAULT_PRESET: &str = "default";

/// Name of the overclock preset.
pub const OVERCLOCK_PRESET: &str = "overclock";

/// Returns the CV184x topology table.
#[must_use]
pub fn topology() -> Topology {
    let mut t = Topology::new();
    t.push(NodeSpec::source("clk_osc", OSC_MHZ))
        .push(NodeSpec::source("clk_rtc", RTC_MHZ));

    // Primary PLLs.
    t.push(NodeSpec::pll("clk_fpll", "clk_osc", 40))
        .push(NodeSpec::pll("clk_mipimpll", "clk_osc", 36))
        .push(NodeSpec::pll("clk_mpll", "clk_osc", 48))
        .push(NodeSpec::pll("clk_tpll", "clk_osc", 60))
        .push(NodeSpec::pll("clk_appll", "clk_osc", 40))
        .push(NodeSpec::pll("clk_rvpll", "clk_osc", 48));

    // Secondary PLLs behind the MIPI PLL.
    t.push(NodeSpec::sub_pll(
        "clk_a0pll",
        "clk_mipimpll",
        8,
        Divider::from_units(732_421_875),
    ))
    .push(NodeSpec::sub_pll("clk_cam0pll", "clk_mipimpll", 66, whole(50)))
    .push(NodeSpec::sub_pll("clk_cam1pll", "clk_mipimpll", 64, whole(36)))
    .push(NodeSpec::sub_pll("clk_disppll", "clk_mipimpll", 33, whole(25)));

    // Oscillator-derived slow clocks.
    t.push(NodeSpec::leaf("clk_1m", "clk_osc", 25))
        .leaves("clk_1m", 1, [
            "clk_timer0",
            "clk_timer1",
            "clk_timer2",
            "clk_timer3",
            "clk_timer4",
            "clk_timer5",
            "clk_timer6",
            "clk_timer7",
        ])
        .leaves("clk_osc", 1, ["clk_xtal_ap", "clk_efuse", "clk_pwm_src"])
        .leaves("clk_rtc", 1, ["clk_rtc_32k", "clk_pm", "clk_wdt"]);

    // FPLL: bridges and general peripherals.
    t.leaves("clk_fpll", 10, ["clk_fab_100m"])
        .leaves("clk_fpll", 4, ["clk_hsperi", "clk_spi_nand"])
        .leaves("clk_fpll", 40, [
            "clk_uart0",
            "clk_uart1",
            "clk_uart2",
            "clk_uart3",
            "clk_uart4",
        ])
        .leaves("clk_fpll", 5, ["clk_sd0", "clk_sd1", "clk_emmc"])
        .leaves("clk_fpll", 8, ["clk_eth0_500m", "clk_usb"])
        .leaves("clk_fpll", 20, ["clk_spi", "clk_i2c"])
        .leaves("clk_fpll", 2, ["clk_axi4", "clk_cpu_gic"]);
    t.leaves("clk_fab_100m", 1, [
        "clk_apb_uart",
        "clk_apb_i2c0",
        "clk_apb_i2c1",
        "clk_apb_i2c2",
        "clk_apb_i2c3",
        "clk_apb_i2c4",
        "clk_apb_spi0",
        "clk_apb_spi1",
        "clk_apb_spi2",
        "clk_apb_spi3",
        "clk_apb_pwm",
        "clk_apb_gpio",
        "clk_apb_saradc",
        "clk_apb_efuse",
    ])
    .leaves("clk_fab_100m", 2, ["clk_apb_wdt", "clk_apb_rtc"]);
    t.leaves("clk_hsperi", 1, [
        "clk_axi_sd0",
        "clk_axi_sd1",
        "clk_axi_emmc",
        "clk_axi_eth0",
        "clk_axi_usb",
        "clk_axi_sdma",
    ])
    .leaves("clk_hsperi", 2, ["clk_apb_usb", "clk_apb_eth0"]);
    t.leaves("clk_spi_nand", 1, ["clk_axi_nand", "clk_spi_nand_core"])
        .leaves("clk_spi_nand", 2, ["clk_ahb_spi_nor"]);

    // MIPI PLL: ISP and sensor domain.
    t.leaves("clk_mipimpll", 3, ["clk_raw_axi"]).leaves(
        "clk_raw_axi",
        1,
        ["clk_axi_isp", "clk_axi_vip", "clk_csi_be", "clk_vip_sys"],
    );
    t.leaves("clk_cam0pll", 2, ["clk_cam0_sensor", "clk_cam0_mclk"])
        .leaves("clk_cam0pll", 4, ["clk_vc_src0"]);
    t.leaves("clk_cam1pll", 2, ["clk_cam1_sensor", "clk_cam1_mclk"])
        .leaves("clk_cam1pll", 4, ["clk_vc_src1", "clk_h264c", "clk_h265c"]);
    t.leaves("clk_disppll", 8, ["clk_sys_disp"])
        .leaves("clk_disppll", 4, ["clk_disp_src_vip", "clk_dsi_mac"]);
    t.leaves("clk_sys_disp", 1, ["clk_axi_disp", "clk_apb_disp", "clk_mipi_tx"])
        .leaves("clk_sys_disp", 2, ["clk_osd"]);
    t.leaves("clk_a0pll", 40, ["clk_a24k"])
        .leaves("clk_a24k", 1, ["clk_audsrc", "clk_apb_audsrc"])
        .push(NodeSpec::leaf("clk_i2s_mclk", "clk_a24k", 1).with_multiplier(2))
        .leaves("clk_a24k", 2, ["clk_i2s0_bclk", "clk_i2s1_bclk"]);

    // MPLL: memory and media fabric.
    t.leaves("clk_mpll", 2, ["clk_ddr_axi", "clk_vpss", "clk_jpeg"])
        .leaves("clk_mpll", 4, ["clk_axi_video_codec", "clk_ive", "clk_dwa"])
        .leaves("clk_mpll", 6, ["clk_cfg_reg_vip", "clk_cfg_reg_vc"]);

    // TPLL: tensor processor.
    t.leaves("clk_tpll", 3, ["clk_tpu", "clk_tpu_gdma"])
        .leaves("clk_tpll", 6, ["clk_tpu_fab"]);

    // APPLL: application cores.
    t.leaves("clk_appll", 1, ["clk_a53"])
        .leaves("clk_appll", 2, ["clk_a53_axi"])
        .leaves("clk_appll", 4, ["clk_a53_dbg"]);

    // RVPLL: RISC-V cores.
    t.leaves("clk_rvpll", 1, ["clk_c906_0", "clk_c906_1"])
        .leaves("clk_rvpll", 2, ["clk_c906_0_axi", "clk_c906_1_axi"])
        .leaves("clk_rvpll", 4, ["clk_c906_0_dbg", "clk_c906_1_dbg"]);

    t
}

/// Returns the CV184x presets: `default` (`ND`) and `overclock` (`OD`).
///
/// `default` resets every multiplier and divider to the topology table.
/// `overclock` is a sparse patch over whatever is currently configured.
#[must_use]
pub fn presets() -> PresetTable {
    [
        Preset::new(DEFAULT_PRESET, PresetMode::Reset).alias("ND"),
        Preset::new(OVERCLOCK_PRESET, PresetMode::Patch)
            .alias("OD")
            .multiplier("clk_appll", 44)
            .multiplier("clk_rvpll", 64)
            .divider("clk_tpu", whole(2))
            .divider("clk_tpu_gdma", whole(2)),
    ]
    .into_iter()
    .collect()
}

/// Builds a CV184x tree at its documented defaults.
///
/// # Errors
///
/// Never fails for the shipped table; the `Result` surfaces table edits
/// that break it.
pub fn clock_tree() -> Result<ClockTree, TopologyError> {
    ClockTree::new(&topology(), presets())
}

const fn whole(value: u64) -> Divider {
    Divider::from_units(value * crate::divider::DIVIDER_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeKind;

    #[test]
    fn table_builds() {
        let tree = clock_tree().unwrap();
        assert_eq!(tree.len(), topology().len());
        assert_eq!(tree.roots().len(), 2);
    }

    #[test]
    fn documented_defaults() {
        let tree = clock_tree().unwrap();
        let f = |name| tree.frequency_of(name).unwrap();
        assert_eq!(f("clk_fpll"), 1000.0);
        assert_eq!(f("clk_mipimpll"), 900.0);
        assert_eq!(f("clk_mpll"), 1200.0);
        assert_eq!(f("clk_tpll"), 1500.0);
        assert_eq!(f("clk_appll"), 1000.0);
        assert_eq!(f("clk_rvpll"), 1200.0);
        assert_eq!(f("clk_cam1pll"), 1600.0);
        assert_eq!(f("clk_fab_100m"), 100.0);
        assert_eq!(f("clk_1m"), 1.0);
        assert_eq!(f("clk_uart0"), 25.0);
        assert_eq!(f("clk_tpu"), 500.0);
        assert!((f("clk_a0pll") - 983.04).abs() < 1e-9);
    }

    #[test]
    fn sub_plls_hang_off_the_mipi_pll() {
        let tree = clock_tree().unwrap();
        let mipi = tree.lookup("clk_mipimpll").unwrap();
        for name in ["clk_a0pll", "clk_cam0pll", "clk_cam1pll", "clk_disppll"] {
            let node = tree.node(name).unwrap();
            assert_eq!(node.kind(), NodeKind::SubPll);
            assert_eq!(node.parent(), Some(mipi), "{name} parent");
        }
    }

    #[test]
    fn overclock_targets_exist() {
        let tree = clock_tree().unwrap();
        let od = tree.presets().find("OD").unwrap();
        for o in &od.overrides {
            assert!(tree.lookup(&o.node).is_ok(), "{} missing", o.node);
        }
    }
}
