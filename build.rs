//! # TianSuan Digital Card - Tauri Cargo 构建脚本
//!
//! 在编译主项目之前生成 Tauri 运行时所需的资源绑定、权限清单和平台资源文件。

fn main() {
    tauri_build::build()
}
