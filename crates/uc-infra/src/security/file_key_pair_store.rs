use std::fs;
use std::io;
use std::path::PathBuf;

use uc_core::ports::{KeyPairStoreError, SecureKeyPairStorePort};

/// File-backed key pair store for headless installs.
///
/// 基于文件的密钥对存储：临时文件 + rename 提交，Unix 下权限为 0600。
#[derive(Clone)]
pub struct FileKeyPairStore {
    path: PathBuf,
}

impl FileKeyPairStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_secret(&self) -> Result<Option<Vec<u8>>, KeyPairStoreError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(KeyPairStoreError::Store(format!(
                "failed to read key pair file: {err}"
            ))),
        }
    }

    fn write_secret(&self, secret: &[u8]) -> Result<(), KeyPairStoreError> {
        let parent = self.path.parent().ok_or_else(|| {
            KeyPairStoreError::Store("key pair path missing parent directory".to_string())
        })?;
        fs::create_dir_all(parent).map_err(|err| {
            KeyPairStoreError::Store(format!("failed to create key pair dir: {err}"))
        })?;

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, secret).map_err(|err| {
            KeyPairStoreError::Store(format!("failed to write key pair temp file: {err}"))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o600)).map_err(|err| {
                KeyPairStoreError::Store(format!("failed to set key pair permissions: {err}"))
            })?;
        }

        fs::rename(&tmp_path, &self.path).map_err(|err| {
            KeyPairStoreError::Store(format!("failed to commit key pair file: {err}"))
        })?;

        Ok(())
    }
}

impl SecureKeyPairStorePort for FileKeyPairStore {
    fn load_secret(&self) -> Result<Option<Vec<u8>>, KeyPairStoreError> {
        self.read_secret()
    }

    fn store_secret(&self, secret: &[u8]) -> Result<(), KeyPairStoreError> {
        self.write_secret(secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyPairStore::new(temp_dir.path().join("identity").join("key_pair.bin"));
        assert!(store.load_secret().unwrap().is_none());
    }

    #[test]
    fn store_creates_parent_and_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("identity").join("key_pair.bin");
        let store = FileKeyPairStore::new(path.clone());

        store.store_secret(&[1, 2, 3]).unwrap();
        store.store_secret(&[9, 8, 7, 6]).unwrap();

        assert_eq!(store.load_secret().unwrap(), Some(vec![9, 8, 7, 6]));
        assert!(!path.with_extension("tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn stored_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("key_pair.bin");
        FileKeyPairStore::new(path.clone()).store_secret(b"secret").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
