use std::{
    fs,
    path::{Path, PathBuf},
};

use gdal::{
    programs::raster::{build_vrt, BuildVRTOptions},
    Dataset, Metadata as GdalMetadata,
};
use itertools::Itertools;
use log::info;
use quick_xml::{
    events::{BytesEnd, BytesStart, BytesText, Event},
    Writer,
};

use crate::{
    components::{
        metadata::{write_dataset_metadata, MetadataDictionary},
        ByteOrder, GeoTransform, SampleType,
    },
    errors::Result,
};

/// One logical band of a virtual raster descriptor.
///
/// The source path is reduced to its file name when the descriptor is
/// rendered: descriptors reference their band files relative to their own
/// location and never store directories.
#[derive(Debug, Clone)]
pub struct VrtBand {
    source: PathBuf,
    data_type: SampleType,
    description: Option<String>,
    no_data: Option<f64>,
}

impl VrtBand {
    pub fn new(source: impl Into<PathBuf>, data_type: SampleType) -> Self {
        Self {
            source: source.into(),
            data_type,
            description: None,
            no_data: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_no_data(mut self, no_data: f64) -> Self {
        self.no_data = Some(no_data);
        self
    }

    pub fn data_type(&self) -> SampleType {
        self.data_type
    }

    fn source_file_name(&self) -> String {
        self.source
            .file_name()
            .unwrap_or(self.source.as_os_str())
            .to_string_lossy()
            .into_owned()
    }
}

/// Descriptor for a multi-band raster whose pixels live in separate
/// physical band files. No pixel data is read or copied while assembling;
/// a missing band file only surfaces when a consumer reads that band.
#[derive(Debug, Clone)]
pub struct VrtDescriptor {
    width: usize,
    height: usize,
    geo_transform: GeoTransform,
    byte_order: ByteOrder,
    srs: Option<String>,
    metadata: MetadataDictionary,
    bands: Vec<VrtBand>,
}

impl VrtDescriptor {
    pub fn new(
        width: usize,
        height: usize,
        geo_transform: GeoTransform,
        byte_order: ByteOrder,
    ) -> Self {
        Self {
            width,
            height,
            geo_transform,
            byte_order,
            srs: None,
            metadata: MetadataDictionary::new(),
            bands: Vec::new(),
        }
    }

    pub fn with_srs(mut self, srs: impl Into<String>) -> Self {
        self.srs = Some(srs.into());
        self
    }

    pub fn with_metadata(mut self, metadata: MetadataDictionary) -> Self {
        self.metadata = metadata;
        self
    }

    /// Append a band. Bands are numbered 1-based in push order.
    pub fn push_band(&mut self, band: VrtBand) {
        self.bands.push(band);
    }

    pub fn bands(&self) -> &[VrtBand] {
        &self.bands
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Render the descriptor as VRT XML.
    ///
    /// Field names and the relative-path convention are a compatibility
    /// contract consumed by the engine and by third-party raster tools.
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        let mut root = BytesStart::new("VRTDataset");
        root.push_attribute(("rasterXSize", self.width.to_string().as_str()));
        root.push_attribute(("rasterYSize", self.height.to_string().as_str()));
        writer.write_event(Event::Start(root))?;
        if let Some(srs) = &self.srs {
            write_text_element(&mut writer, "SRS", srs)?;
        }
        let transform = self.geo_transform.as_array().iter().join(", ");
        write_text_element(&mut writer, "GeoTransform", &transform)?;
        if !self.metadata.is_empty() {
            writer.write_event(Event::Start(BytesStart::new("Metadata")))?;
            for entry in &self.metadata {
                let mut item = BytesStart::new("MDI");
                item.push_attribute(("key", entry.key.as_str()));
                writer.write_event(Event::Start(item))?;
                writer.write_event(Event::Text(BytesText::new(&entry.value)))?;
                writer.write_event(Event::End(BytesEnd::new("MDI")))?;
            }
            writer.write_event(Event::End(BytesEnd::new("Metadata")))?;
        }
        for (index, band) in self.bands.iter().enumerate() {
            self.write_band(&mut writer, index, band)?;
        }
        writer.write_event(Event::End(BytesEnd::new("VRTDataset")))?;
        let mut rendered = writer.into_inner();
        rendered.push(b'\n');
        Ok(String::from_utf8(rendered).expect("writer emits utf-8"))
    }

    fn write_band(
        &self,
        writer: &mut Writer<Vec<u8>>,
        index: usize,
        band: &VrtBand,
    ) -> Result<()> {
        let mut element = BytesStart::new("VRTRasterBand");
        element.push_attribute(("dataType", band.data_type.gdal_name()));
        element.push_attribute(("band", (index + 1).to_string().as_str()));
        element.push_attribute(("subClass", "VRTRawRasterBand"));
        writer.write_event(Event::Start(element))?;
        if let Some(description) = &band.description {
            write_text_element(writer, "Description", description)?;
        }
        if let Some(no_data) = band.no_data {
            write_text_element(writer, "NoDataValue", &no_data.to_string())?;
        }
        let mut source = BytesStart::new("SourceFilename");
        source.push_attribute(("relativeToVRT", "1"));
        writer.write_event(Event::Start(source))?;
        writer.write_event(Event::Text(BytesText::new(&band.source_file_name())))?;
        writer.write_event(Event::End(BytesEnd::new("SourceFilename")))?;
        write_text_element(writer, "ByteOrder", self.byte_order.vrt_tag())?;
        write_text_element(writer, "ImageOffset", "0")?;
        let pixel_offset = band.data_type.sample_bytes();
        write_text_element(writer, "PixelOffset", &pixel_offset.to_string())?;
        write_text_element(writer, "LineOffset", &(pixel_offset * self.width).to_string())?;
        writer.write_event(Event::End(BytesEnd::new("VRTRasterBand")))?;
        Ok(())
    }

    /// Write the descriptor sidecar, conventionally next to its band files.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        info!("writing descriptor {}", path.display());
        fs::write(path, self.to_xml()?)?;
        Ok(())
    }
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Combine independently encoded single-band files into one descriptor.
///
/// Band order follows the file list order. Each band's description is the
/// dotted suffix of its file name and its no-data value is taken from
/// `no_data_values` by position.
pub fn build_from_files(
    vrt_path: impl AsRef<Path>,
    band_files: &[PathBuf],
    no_data_values: &[Option<f64>],
    metadata: &MetadataDictionary,
) -> Result<()> {
    let vrt_path = vrt_path.as_ref();
    info!(
        "building {} from {} band files",
        vrt_path.display(),
        band_files.len()
    );
    let sources = band_files
        .iter()
        .map(Dataset::open)
        .collect::<gdal::errors::Result<Vec<_>>>()?;
    let options = BuildVRTOptions::new(vec!["-separate"])?;
    let mut vrt = build_vrt(Some(vrt_path), &sources, Some(options))?;
    for (index, file) in band_files.iter().enumerate() {
        let mut band = vrt.rasterband(index + 1)?;
        if let Some(label) = band_label(file) {
            band.set_metadata_item("Description", &label, "")?;
        }
        if let Some(no_data) = no_data_values.get(index).copied().flatten() {
            band.set_no_data_value(Some(no_data))?;
        }
    }
    write_dataset_metadata(&mut vrt, metadata)?;
    vrt.close()?;
    Ok(())
}

/// Dotted suffix before the `.tif` extension, used as a band label
/// (`mosaic.vx.tif` gives `vx`).
pub fn band_label(path: impl AsRef<Path>) -> Option<String> {
    let name = path.as_ref().file_name()?.to_str()?;
    let head = &name[..name.find(".tif")?];
    head.rsplit_once('.').map(|(_, label)| label.to_string())
}

/// Append `suffix` after the last path component, keeping its extension.
pub fn append_suffix(path: impl AsRef<Path>, suffix: &str) -> PathBuf {
    let mut name = path.as_ref().as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Companion descriptor for `path`, when one exists beside it.
pub fn check_for_vrt(path: impl AsRef<Path>) -> Option<PathBuf> {
    let vrt = append_suffix(path, ".vrt");
    vrt.exists().then_some(vrt)
}
