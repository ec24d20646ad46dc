use std::{
    fs,
    io::{Read, Seek},
    path::Path,
};

use zip::read::ZipArchive;

use crate::LoadError;

/// Represents an archive of roms
/// it contains all kind of information about the information of the archives
pub struct RomArchive<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> RomArchive<R> {
    /// Will open the zip archive read from the given reader
    pub fn new(reader: R) -> Result<Self, LoadError> {
        Ok(Self {
            archive: ZipArchive::new(reader)?,
        })
    }

    /// Will return all the rom names available to be chosen
    pub fn file_names(&self) -> Vec<&'_ str> {
        self.archive.file_names().collect()
    }

    /// Will decompress the information from the zip archive
    pub fn get_file_data(&mut self, name: &str) -> Result<Rom, LoadError> {
        let mut file = self.archive.by_name(name)?;
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)?;
        log::debug!("extracted rom {} with {} bytes", name, data.len());
        Ok(Rom::new(name, data))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents a single rom with it's information
pub struct Rom {
    /// The rom name
    name: String,
    /// The content data of the rom
    /// stored as a u8 slice on the heap
    data: Box<[u8]>,
}

impl Rom {
    /// Will generate a new rom based of the given data
    pub fn new<D: Into<Box<[u8]>>>(name: &str, data: D) -> Self {
        Rom {
            name: name.to_string(),
            data: data.into(),
        }
    }

    /// Will read the whole file, the name of the rom is the file name.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(&name, data))
    }

    /// Will return a slice internal values of the given data
    pub fn get_data(&self) -> &[u8] {
        &self.data
    }

    /// Will return the name of the rom.
    pub fn get_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use zip::{write::FileOptions, CompressionMethod, ZipWriter};

    use super::*;
    use crate::opcode::{build_opcode, Opcode};

    const RAW_ROM_DATA: [Opcode; 24] = [
        0x00E0, 0x6C00, 0x4C00, 0x6E0F, 0xA203, 0x6020, 0xF055, 0x00E0, 0x22BE, 0x2276, 0x228E,
        0x225E, 0x2246, 0x1210, 0x6100, 0x6217, 0x6304, 0x4110, 0x00EE, 0xA2E8, 0xF11E, 0xF065,
        0x4000, 0x1234,
    ];

    const ROM_NAMES: [&str; 3] = ["15PUZZLE", "BLINKY", "PONG"];

    fn raw_rom() -> Vec<u8> {
        RAW_ROM_DATA.iter().flat_map(|op| op.to_be_bytes()).collect()
    }

    /// will build an in memory archive, every rom contains the raw rom data
    fn archive(method: CompressionMethod) -> RomArchive<Cursor<Vec<u8>>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(method);
        for name in ROM_NAMES.iter().rev() {
            writer.start_file(*name, options).unwrap();
            writer.write_all(&raw_rom()).unwrap();
        }
        let cursor = writer.finish().unwrap();
        RomArchive::new(Cursor::new(cursor.into_inner())).unwrap()
    }

    #[test]
    fn test_rom_extract() {
        for method in [CompressionMethod::Stored, CompressionMethod::Deflated] {
            let mut ra = archive(method);
            let rom = ra.get_file_data(ROM_NAMES[0]).unwrap();
            let data = rom.get_data();

            assert_eq!(rom.get_name(), ROM_NAMES[0]);
            assert_eq!(data.len(), RAW_ROM_DATA.len() * 2);
            for i in (0..data.len()).step_by(2) {
                assert_eq!(build_opcode(data, i), Ok(RAW_ROM_DATA[i / 2]));
            }
        }
    }

    #[test]
    fn test_file_names() {
        let ra = archive(CompressionMethod::Stored);
        let mut files = ra.file_names();
        files.sort_unstable();

        assert_eq!(&ROM_NAMES, &files[..]);
    }

    #[test]
    fn test_missing_rom() {
        let mut ra = archive(CompressionMethod::Stored);
        assert!(matches!(
            ra.get_file_data("MISSING"),
            Err(LoadError::Archive(_))
        ));
    }

    #[test]
    fn test_not_an_archive() {
        assert!(RomArchive::new(Cursor::new(vec![0u8; 16])).is_err());
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("chip-rom-{}.ch8", std::process::id()));
        fs::write(&path, raw_rom()).unwrap();

        let rom = Rom::from_file(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(rom.get_data(), &raw_rom()[..]);
        assert_eq!(
            rom.get_name(),
            path.file_name().unwrap().to_str().unwrap()
        );

        assert!(matches!(
            Rom::from_file(&path),
            Err(LoadError::Io(_))
        ));
    }
}
