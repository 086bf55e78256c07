//! Windows registry hive.

use winreg::RegKey;
use winreg::enums::{HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE};

use crate::paths::ConfigHive;

/// Reads launcher keys from the Windows registry.
///
/// Keys are written with their root first: `HKLM\SOFTWARE\Valve\Steam`
/// or `HKEY_CURRENT_USER\Software\...`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryHive;

impl ConfigHive for RegistryHive {
    fn read_string(&self, key: &str, value_name: &str) -> Option<String> {
        let (root, subkey) = split_root(key)?;
        let key = root.open_subkey(subkey).ok()?;
        key.get_value::<String, _>(value_name).ok()
    }
}

fn split_root(key: &str) -> Option<(RegKey, &str)> {
    let (root, subkey) = key.split_once('\\')?;
    let root = match root.to_ascii_uppercase().as_str() {
        "HKLM" | "HKEY_LOCAL_MACHINE" => HKEY_LOCAL_MACHINE,
        "HKCU" | "HKEY_CURRENT_USER" => HKEY_CURRENT_USER,
        _ => return None,
    };
    Some((RegKey::predef(root), subkey))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_root_accepts_short_and_long_names() {
        assert_eq!(
            split_root(r"HKLM\SOFTWARE\Valve\Steam").map(|(_, s)| s),
            Some(r"SOFTWARE\Valve\Steam")
        );
        assert!(split_root(r"HKEY_CURRENT_USER\Software\X").is_some());
        assert!(split_root(r"HKCR\Foo").is_none());
        assert!(split_root("HKLM").is_none());
    }

    #[test]
    fn missing_key_reads_none() {
        assert!(
            RegistryHive
                .read_string(r"HKLM\SOFTWARE\vrconvert-test-missing", "InstallPath")
                .is_none()
        );
    }
}
